//! Creature controllers
//!
//! A controller decides what its creature does on its turn. The core only
//! asks for a command and tells the controller when its creature dies;
//! decision making itself lives outside the core.

use std::collections::VecDeque;
use std::fmt::Debug;

use super::{CommandKind, World};
use crate::creature::CreatureId;

pub trait Controller: Debug {
    /// Pick the next command for `me`. `None` means wait.
    fn make_move(&mut self, world: &World, me: CreatureId) -> Option<CommandKind>;

    /// Called once when the controlled creature dies.
    fn on_killed(&mut self, _me: CreatureId, _attacker: Option<CreatureId>) {}

    /// The command chosen this turn was refused.
    fn on_refused(&mut self, _me: CreatureId, _reason: &str) {}

    fn is_player(&self) -> bool {
        false
    }
}

/// Does nothing. Dead creatures end up with one of these.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpController;

impl Controller for NoOpController {
    fn make_move(&mut self, _world: &World, _me: CreatureId) -> Option<CommandKind> {
        None
    }
}

/// Plays back a fixed list of commands, then waits
#[derive(Debug, Clone, Default)]
pub struct ScriptedController {
    commands: VecDeque<CommandKind>,
}

impl ScriptedController {
    pub fn new(commands: impl IntoIterator<Item = CommandKind>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }

    pub fn push(&mut self, command: CommandKind) {
        self.commands.push_back(command);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Controller for ScriptedController {
    fn make_move(&mut self, _world: &World, _me: CreatureId) -> Option<CommandKind> {
        self.commands.pop_front()
    }
}

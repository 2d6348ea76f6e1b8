//! World state
//!
//! The [`World`] owns every creature, their controllers, the tribe registry
//! and the level. Creatures refer to each other by id; anything that may have
//! died in the meantime is looked up again before use.

mod action;
mod controller;
mod events;
mod level;
mod lifecycle;
mod message;
mod options;
mod scheduler;

pub use action::{ActionError, Command, CommandKind, CreatureAction};
pub use controller::{Controller, NoOpController, ScriptedController};
pub use events::{GameEvent, StatId, Statistics};
pub use level::{GridLevel, Level};
pub use message::{Audience, Message, MessageLog, MsgType};
pub use options::{ConfigError, Tuning};

use hashbrown::HashMap;
use tracing::debug;

use crate::consts::SIGHT_RANGE;
use crate::creature::{
    BodyPart, Creature, CreatureId, CreatureTemplate, LastingEffect, TribeId, TribeRegistry,
};
use crate::geom::Vec2;
use crate::object::{Item, ItemId};
use crate::rng::GameRng;

/// The simulation
#[derive(Debug)]
pub struct World {
    pub(crate) creatures: HashMap<CreatureId, Creature>,
    pub(crate) controllers: HashMap<CreatureId, Box<dyn Controller>>,
    pub(crate) tribes: TribeRegistry,
    pub(crate) level: Box<dyn Level>,
    pub(crate) rng: GameRng,
    pub(crate) tuning: Tuning,
    pub(crate) messages: MessageLog,
    pub(crate) stats: Statistics,
    pub(crate) events: Vec<GameEvent>,
    /// Clock driving effect timeouts and bleeding
    pub(crate) real_time: f64,
    next_creature: u32,
    next_item: u32,
}

impl World {
    pub fn new(level: Box<dyn Level>, seed: u64) -> Self {
        Self::with_tuning(level, seed, Tuning::default())
    }

    pub fn with_tuning(level: Box<dyn Level>, seed: u64, tuning: Tuning) -> Self {
        Self {
            creatures: HashMap::new(),
            controllers: HashMap::new(),
            tribes: TribeRegistry::new(),
            level,
            rng: GameRng::new(seed),
            tuning,
            messages: MessageLog::new(),
            stats: Statistics::new(),
            events: Vec::new(),
            real_time: 0.0,
            next_creature: 1,
            next_item: 1,
        }
    }

    pub fn add_tribe(&mut self, name: impl Into<String>) -> TribeId {
        self.tribes.add(name)
    }

    pub fn tribes(&self) -> &TribeRegistry {
        &self.tribes
    }

    pub fn tribes_mut(&mut self) -> &mut TribeRegistry {
        &mut self.tribes
    }

    /// Build a creature and put it on the level.
    ///
    /// Returns `None` if the square cannot be occupied or the tribe is
    /// unknown.
    pub fn spawn(
        &mut self,
        template: CreatureTemplate,
        tribe: TribeId,
        pos: Vec2,
        controller: Box<dyn Controller>,
    ) -> Option<CreatureId> {
        if self.tribes.get(tribe).is_none() || !self.level.can_occupy(pos) {
            return None;
        }
        let id = CreatureId(self.next_creature);
        self.next_creature += 1;
        let mut creature = Creature::new(id, tribe, template);
        creature.position = pos;
        creature.time = self.real_time;
        creature.last_tick = self.real_time;
        self.level.place_creature(id, pos);
        self.tribes.get_mut(tribe)?.add_member(id);
        debug!(creature = %creature.name, %id, %pos, "spawned");
        self.creatures.insert(id, creature);
        self.controllers.insert(id, controller);
        Some(id)
    }

    /// A creature by id, dead or alive
    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.get(&id)
    }

    pub fn creature_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.creatures.get_mut(&id)
    }

    pub fn is_alive(&self, id: CreatureId) -> bool {
        self.creatures.get(&id).is_some_and(|c| !c.is_dead())
    }

    /// Every creature id, sorted
    pub fn ids(&self) -> Vec<CreatureId> {
        let mut ids: Vec<CreatureId> = self.creatures.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Ids of creatures still alive, sorted
    pub fn living(&self) -> Vec<CreatureId> {
        let mut ids: Vec<CreatureId> = self
            .creatures
            .values()
            .filter(|c| !c.is_dead())
            .map(|c| c.id)
            .collect();
        ids.sort();
        ids
    }

    /// Replace a creature's controller. Does nothing for the dead.
    pub fn set_controller(&mut self, id: CreatureId, controller: Box<dyn Controller>) {
        if self.is_alive(id) {
            self.controllers.insert(id, controller);
        }
    }

    pub fn next_item_id(&mut self) -> ItemId {
        let id = ItemId(self.next_item);
        self.next_item += 1;
        id
    }

    /// Put an item in a creature's inventory.
    pub fn give(&mut self, id: CreatureId, item: Item) {
        if let Some(c) = self.creatures.get_mut(&id) {
            c.equipment.add(item);
        }
    }

    pub fn level(&self) -> &dyn Level {
        self.level.as_ref()
    }

    pub fn level_mut(&mut self) -> &mut dyn Level {
        self.level.as_mut()
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut MessageLog {
        &mut self.messages
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn real_time(&self) -> f64 {
        self.real_time
    }

    /// Whether `viewer` can see `target`: eyes, invisibility, range and
    /// line of sight.
    pub fn can_see(&self, viewer: CreatureId, target: CreatureId) -> bool {
        let (Some(v), Some(t)) = (self.creatures.get(&viewer), self.creatures.get(&target)) else {
            return false;
        };
        if v.is_dead() || t.is_dead() {
            return false;
        }
        if viewer == target {
            return true;
        }
        !v.is_blind()
            && !t.is_affected(LastingEffect::Invisible)
            && v.position().dist8(t.position()) <= SIGHT_RANGE
            && self.level.line_of_sight(v.position(), t.position())
    }

    pub fn is_enemy(&self, a: CreatureId, b: CreatureId) -> bool {
        match (self.creatures.get(&a), self.creatures.get(&b)) {
            (Some(a), Some(b)) => a.is_enemy(b, &self.tribes),
            _ => false,
        }
    }

    /// Injure a body part and carry out what the injury leaves behind:
    /// the dropped weapon and any severed part land on the creature's square.
    pub fn injure_body_part(&mut self, id: CreatureId, part: BodyPart, sever: bool) {
        let Some(c) = self.creatures.get_mut(&id) else {
            return;
        };
        let pos = c.position();
        let injury = c.injure_body_part(part, sever, &mut self.messages);
        if let Some(weapon) = injury.dropped_weapon {
            self.level.drop_item(pos, weapon);
        }
        if let Some(severed) = injury.severed {
            let item_id = self.next_item_id();
            self.level
                .drop_item(pos, Item::severed(item_id, severed.name, severed.weight));
        }
        if let Some(stat) = injury.stat {
            self.stats.add(stat);
        }
    }
}

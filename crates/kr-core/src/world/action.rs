//! Validated commands
//!
//! Asking whether a creature may do something is separate from doing it.
//! The constructors on [`World`] check the current state and hand back a
//! [`Command`] or the reason it was refused; [`World::perform`] commits a
//! command, checking it once more since the world may have moved on.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::message::sentence;
use super::{GameEvent, MsgType, World};
use crate::combat::AttackLevel;
use crate::consts::FULL_HEALTH_EPSILON;
use crate::creature::{BodyPart, CreatureFlags, CreatureId, LastingEffect, ModifierType, SkillId};
use crate::geom::Vec2;
use crate::object::ItemId;

/// What a creature wants to do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandKind {
    Wait,
    /// Step in a direction, swapping with a friend in the way
    Move(Vec2),
    Swap { dir: Vec2, force: bool },
    Attack {
        target: CreatureId,
        level: Option<AttackLevel>,
    },
    Equip(ItemId),
    Unequip(ItemId),
    PickUp(Vec<ItemId>),
    Drop(Vec<ItemId>),
    HealOther(Vec2),
    Consume(Vec2),
    FlyAway,
    Disappear,
}

/// Why a command cannot be carried out
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Not possible, nothing worth telling the creature
    #[error("impossible action")]
    Impossible,

    #[error("{0}")]
    Refused(String),
}

/// A command that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    actor: CreatureId,
    kind: CommandKind,
}

impl Command {
    pub fn actor(&self) -> CreatureId {
        self.actor
    }

    pub fn kind(&self) -> &CommandKind {
        &self.kind
    }
}

pub type CreatureAction = Result<Command, ActionError>;

fn refuse(reason: impl Into<String>) -> ActionError {
    ActionError::Refused(reason.into())
}

impl World {
    /// Validate a command for `actor`.
    pub fn check(&self, actor: CreatureId, kind: CommandKind) -> CreatureAction {
        self.validate(actor, &kind)?;
        Ok(Command { actor, kind })
    }

    pub fn wait(&self, actor: CreatureId) -> CreatureAction {
        self.check(actor, CommandKind::Wait)
    }

    pub fn move_dir(&self, actor: CreatureId, dir: Vec2) -> CreatureAction {
        self.check(actor, CommandKind::Move(dir))
    }

    pub fn swap(&self, actor: CreatureId, dir: Vec2, force: bool) -> CreatureAction {
        self.check(actor, CommandKind::Swap { dir, force })
    }

    pub fn attack(
        &self,
        actor: CreatureId,
        target: CreatureId,
        level: Option<AttackLevel>,
    ) -> CreatureAction {
        self.check(actor, CommandKind::Attack { target, level })
    }

    pub fn equip(&self, actor: CreatureId, item: ItemId) -> CreatureAction {
        self.check(actor, CommandKind::Equip(item))
    }

    pub fn unequip(&self, actor: CreatureId, item: ItemId) -> CreatureAction {
        self.check(actor, CommandKind::Unequip(item))
    }

    pub fn pick_up(&self, actor: CreatureId, items: Vec<ItemId>) -> CreatureAction {
        self.check(actor, CommandKind::PickUp(items))
    }

    pub fn drop(&self, actor: CreatureId, items: Vec<ItemId>) -> CreatureAction {
        self.check(actor, CommandKind::Drop(items))
    }

    pub fn heal_other(&self, actor: CreatureId, dir: Vec2) -> CreatureAction {
        self.check(actor, CommandKind::HealOther(dir))
    }

    pub fn consume(&self, actor: CreatureId, dir: Vec2) -> CreatureAction {
        self.check(actor, CommandKind::Consume(dir))
    }

    pub fn fly_away(&self, actor: CreatureId) -> CreatureAction {
        self.check(actor, CommandKind::FlyAway)
    }

    pub fn disappear(&self, actor: CreatureId) -> CreatureAction {
        self.check(actor, CommandKind::Disappear)
    }

    fn is_player(&self, id: CreatureId) -> bool {
        self.controllers.get(&id).is_some_and(|c| c.is_player())
    }

    fn validate(&self, actor: CreatureId, kind: &CommandKind) -> Result<(), ActionError> {
        let me = self
            .creatures
            .get(&actor)
            .filter(|c| !c.is_dead())
            .ok_or(ActionError::Impossible)?;
        let pos = me.position();
        match kind {
            CommandKind::Wait | CommandKind::Disappear => Ok(()),
            CommandKind::Move(dir) => {
                if dir.length8() != 1 || me.flags.contains(CreatureFlags::STATIONARY) {
                    return Err(ActionError::Impossible);
                }
                if self.level.can_occupy(pos + *dir) {
                    Ok(())
                } else {
                    self.validate_swap(actor, *dir, false)
                }
            }
            CommandKind::Swap { dir, force } => self.validate_swap(actor, *dir, *force),
            CommandKind::Attack { target, level } => {
                let other = self
                    .creatures
                    .get(target)
                    .filter(|c| !c.is_dead() && c.id != actor)
                    .ok_or(ActionError::Impossible)?;
                if other.position().dist8(pos) != 1 {
                    return Err(ActionError::Impossible);
                }
                match level {
                    Some(l) if !me.attack_levels().contains(l) => {
                        Err(refuse("Invalid attack level."))
                    }
                    _ => Ok(()),
                }
            }
            CommandKind::Equip(id) => {
                let item = me.equipment.get(*id).ok_or(ActionError::Impossible)?;
                if !me.is_humanoid() {
                    return Err(refuse("Only humanoids can equip items!"));
                }
                let arms = me.num_good(BodyPart::Arm);
                if arms == 0 {
                    return Err(refuse("You have no healthy arms!"));
                }
                if arms == 1 && item.two_handed {
                    return Err(refuse(format!("You need two hands to wield {}!", item.a_name())));
                }
                if !item.can_equip() {
                    return Err(ActionError::Impossible);
                }
                if me.equipment.is_equipped(*id) || !me.equipment.can_equip(item) {
                    return Err(refuse("This slot is already equipped."));
                }
                Ok(())
            }
            CommandKind::Unequip(id) => {
                if !me.equipment.is_equipped(*id) {
                    return Err(refuse("This item is not equipped."));
                }
                if !me.is_humanoid() {
                    return Err(refuse("You can't remove this item!"));
                }
                if me.num_good(BodyPart::Arm) == 0 {
                    return Err(refuse("You have no healthy arms!"));
                }
                Ok(())
            }
            CommandKind::PickUp(ids) => {
                if !me.is_humanoid() {
                    return Err(refuse("You can't pick up anything!"));
                }
                let ground = self.level.items_at(pos);
                let mut weight = me.equipment.total_weight();
                for id in ids {
                    let item = ground
                        .iter()
                        .find(|i| i.id == *id)
                        .ok_or(ActionError::Impossible)?;
                    weight += item.weight;
                }
                if ids.is_empty() {
                    return Err(ActionError::Impossible);
                }
                if weight > 2.0 * me.modifier(ModifierType::InvLimit) as f64 {
                    return Err(refuse("You are carrying too much to pick this up."));
                }
                Ok(())
            }
            CommandKind::Drop(ids) => {
                if !me.is_humanoid() {
                    return Err(refuse("You can't drop this item!"));
                }
                if ids.is_empty() || !ids.iter().all(|id| me.equipment.contains(*id)) {
                    return Err(ActionError::Impossible);
                }
                Ok(())
            }
            CommandKind::HealOther(dir) => {
                let other = self
                    .level
                    .creature_at(pos + *dir)
                    .filter(|id| *id != actor)
                    .and_then(|id| self.creatures.get(&id))
                    .ok_or(ActionError::Impossible)?;
                if !me.skills.has(SkillId::Healing) || other.health() >= FULL_HEALTH_EPSILON {
                    return Err(ActionError::Impossible);
                }
                Ok(())
            }
            CommandKind::Consume(dir) => {
                let other = self
                    .level
                    .creature_at(pos + *dir)
                    .filter(|id| *id != actor)
                    .and_then(|id| self.creatures.get(&id))
                    .ok_or(ActionError::Impossible)?;
                if !me.skills.has(SkillId::Consumption)
                    || !other.is_corporeal()
                    || !me.is_friend(other, &self.tribes)
                {
                    return Err(ActionError::Impossible);
                }
                Ok(())
            }
            CommandKind::FlyAway => {
                if !me.is_affected(LastingEffect::Flying) || self.level.is_covered(pos) {
                    return Err(ActionError::Impossible);
                }
                Ok(())
            }
        }
    }

    fn validate_swap(&self, actor: CreatureId, dir: Vec2, force: bool) -> Result<(), ActionError> {
        let me = self.creatures.get(&actor).ok_or(ActionError::Impossible)?;
        let dest = me.position() + dir;
        if !self.level.in_bounds(dest) {
            return Err(ActionError::Impossible);
        }
        let other = self
            .level
            .creature_at(dest)
            .and_then(|id| self.creatures.get(&id))
            .ok_or(ActionError::Impossible)?;
        if other.is_affected(LastingEffect::Sleep) && !force {
            return Err(refuse(format!("{} is sleeping.", sentence(&other.the_name()))));
        }
        if (me.swap_cooldown > 0 && !self.is_player(actor))
            || other.flags.contains(CreatureFlags::STATIONARY)
            || other.flags.contains(CreatureFlags::INVINCIBLE)
            || dir.length8() != 1
            || (self.is_player(other.id) && !force)
            || (other.is_enemy(me, &self.tribes) && !force)
            || !self.level.is_passable(dest)
        {
            return Err(ActionError::Impossible);
        }
        Ok(())
    }

    /// Commit a validated command.
    ///
    /// Returns false, doing nothing, if the command no longer holds.
    pub fn perform(&mut self, command: Command) -> bool {
        let Command { actor, kind } = command;
        if let Err(e) = self.validate(actor, &kind) {
            warn!(%actor, ?kind, error = %e, "command no longer valid");
            return false;
        }
        debug!(%actor, ?kind, "perform");
        match kind {
            CommandKind::Wait => self.spend_time(actor, 1.0),
            CommandKind::Move(dir) => self.execute_move(actor, dir),
            CommandKind::Swap { dir, force } => {
                self.execute_swap(actor, dir, force);
                self.spend_time(actor, 1.0);
            }
            CommandKind::Attack { target, level } => {
                self.execute_attack(actor, target, level);
            }
            CommandKind::Equip(id) => {
                let Some(c) = self.creatures.get_mut(&actor) else {
                    return false;
                };
                if c.equipment.equip(id).is_err() {
                    return false;
                }
                self.events.push(GameEvent::Equip { who: actor, item: id });
                self.spend_time(actor, 1.0);
            }
            CommandKind::Unequip(id) => {
                let Some(c) = self.creatures.get_mut(&actor) else {
                    return false;
                };
                if c.equipment.unequip(id).is_err() {
                    return false;
                }
                self.spend_time(actor, 1.0);
            }
            CommandKind::PickUp(ids) => self.execute_pick_up(actor, ids),
            CommandKind::Drop(ids) => self.execute_drop(actor, ids),
            CommandKind::HealOther(dir) => self.execute_heal_other(actor, dir),
            CommandKind::Consume(dir) => {
                let pos = match self.creatures.get(&actor) {
                    Some(c) => c.position() + dir,
                    None => return false,
                };
                let Some(target) = self.level.creature_at(pos) else {
                    return false;
                };
                self.consume_creature(actor, target);
                self.spend_time(actor, 2.0);
            }
            CommandKind::FlyAway => self.fly_away_now(actor),
            CommandKind::Disappear => self.disappear_now(actor),
        }
        true
    }

    fn execute_move(&mut self, actor: CreatureId, dir: Vec2) {
        let Some(c) = self.creatures.get(&actor) else {
            return;
        };
        if c.is_affected(LastingEffect::Entangled) {
            self.messages.private(c, "You can't break free!");
            self.spend_time(actor, 1.0);
            return;
        }
        let from = c.position();
        let to = from + dir;
        if self.level.can_occupy(to) {
            if self.level.move_creature(from, to) {
                if let Some(c) = self.creatures.get_mut(&actor) {
                    c.position = to;
                }
            }
        } else {
            self.execute_swap(actor, dir, false);
        }
        let Some(c) = self.creatures.get(&actor) else {
            return;
        };
        if c.is_collapsed() {
            self.messages.you(c, MsgType::Crawl, "");
            self.spend_time(actor, 3.0);
        } else {
            self.spend_time(actor, 1.0);
        }
    }

    fn execute_swap(&mut self, actor: CreatureId, dir: Vec2, force: bool) {
        let cooldown = self.tuning.swap_cooldown;
        let Some(me) = self.creatures.get_mut(&actor) else {
            return;
        };
        me.swap_cooldown = cooldown;
        let from = me.position();
        let to = from + dir;
        self.messages.private(me, "Excuse me!");
        let Some(other_id) = self.level.creature_at(to) else {
            return;
        };
        if !self.level.swap_creatures(from, to) {
            return;
        }
        if let Some(me) = self.creatures.get_mut(&actor) {
            me.position = to;
        }
        if let Some(other) = self.creatures.get_mut(&other_id) {
            other.position = from;
            if !force {
                self.messages.private(other, "Excuse me!");
            }
        }
    }

    fn execute_pick_up(&mut self, actor: CreatureId, ids: Vec<ItemId>) {
        let Some(pos) = self.creatures.get(&actor).map(|c| c.position()) else {
            return;
        };
        let items = self.level.take_items(pos, &ids);
        let Some(c) = self.creatures.get_mut(&actor) else {
            return;
        };
        for item in items {
            let name = item.a_name();
            self.messages.private(c, format!("You pick up {name}"));
            self.messages
                .global(c, format!("{} picks up {name}", sentence(&c.the_name())));
            c.equipment.add(item);
        }
        if c.equipment.total_weight() > c.modifier(ModifierType::InvLimit) as f64 {
            self.messages.private(c, "You are overloaded.");
        }
        self.events.push(GameEvent::Pickup { who: actor, items: ids });
        self.spend_time(actor, 1.0);
    }

    fn execute_drop(&mut self, actor: CreatureId, ids: Vec<ItemId>) {
        let Some(c) = self.creatures.get_mut(&actor) else {
            return;
        };
        let pos = c.position();
        let mut dropped = Vec::new();
        for id in &ids {
            if let Some(item) = c.equipment.remove(*id) {
                let name = item.a_name();
                self.messages.private(c, format!("You drop {name}"));
                self.messages
                    .global(c, format!("{} drops {name}", sentence(&c.the_name())));
                dropped.push(item);
            }
        }
        self.level.drop_items(pos, dropped);
        self.events.push(GameEvent::Drop { who: actor, items: ids });
        self.spend_time(actor, 1.0);
    }

    fn execute_heal_other(&mut self, actor: CreatureId, dir: Vec2) {
        let Some(me) = self.creatures.get(&actor) else {
            return;
        };
        let healer = me.the_name();
        let Some(other) = self
            .level
            .creature_at(me.position() + dir)
            .and_then(|id| self.creatures.get_mut(&id))
        else {
            return;
        };
        self.messages
            .private(other, "\"Let me help you my friend.\"");
        self.messages
            .you(other, MsgType::Are, format!("healed by {healer}"));
        other.heal(1.0, false, &mut self.messages);
        self.spend_time(actor, 1.0);
    }
}

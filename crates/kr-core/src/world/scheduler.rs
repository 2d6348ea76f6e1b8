//! Turn order and the real-time clock
//!
//! Creatures act one at a time, whoever is furthest behind in simulation
//! time going first. Each action pushes the actor's clock forward in
//! proportion to its speed. Effect timeouts, poison and bleeding run off the
//! separate real-time clock advanced by [`World::tick`].

use tracing::{debug, trace};

use super::{ActionError, MsgType, World};
use crate::consts::{SIGHT_RANGE, TIME_UNIT};
use crate::creature::{AttrType, CreatureFlags, CreatureId, LastingEffect};
use crate::geom::Rect;

impl World {
    /// Advance a creature's clock by `turns` actions at its current speed.
    pub fn spend_time(&mut self, id: CreatureId, turns: f64) {
        if let Some(c) = self.creatures.get_mut(&id) {
            let speed = c.attr(AttrType::Speed).max(1);
            c.time += TIME_UNIT * turns / speed as f64;
            trace!(creature = %c.name, time = c.time, "spent time");
        }
    }

    /// Run one turn of a living creature: refresh what it sees, ask its
    /// controller for a command and carry it out.
    ///
    /// # Panics
    /// If the creature is dead or unknown. Only living creatures are
    /// scheduled.
    pub fn make_move(&mut self, id: CreatureId) {
        assert!(self.is_alive(id), "make_move on dead creature {id}");
        let Some(c) = self.creatures.get_mut(&id) else {
            return;
        };
        c.attacks_this_turn = 0;
        let start = c.time;
        if c.is_affected(LastingEffect::Sleep) || c.is_affected(LastingEffect::Stunned) {
            self.spend_time(id, 1.0);
            return;
        }
        c.swap_cooldown = c.swap_cooldown.saturating_sub(1);
        let enemies = self.scan_enemies(id);
        if let Some(c) = self.creatures.get_mut(&id) {
            c.visible_enemies = enemies;
        }

        let command = match self.controllers.remove(&id) {
            Some(mut controller) => {
                let kind = controller.make_move(self, id);
                self.controllers.insert(id, controller);
                kind
            }
            None => None,
        };
        if let Some(kind) = command {
            match self.check(id, kind) {
                Ok(command) => {
                    self.perform(command);
                }
                Err(ActionError::Refused(reason)) => {
                    debug!(%id, %reason, "command refused");
                    if let Some(controller) = self.controllers.get_mut(&id) {
                        controller.on_refused(id, &reason);
                    }
                    if let Some(c) = self.creatures.get(&id) {
                        self.messages.private(c, reason);
                    }
                }
                Err(ActionError::Impossible) => debug!(%id, "impossible command"),
            }
        }

        if let Some(c) = self.creatures.get_mut(&id) {
            c.unknown_attackers.clear();
            let stalled = c.time <= start && !c.dead;
            if stalled {
                self.spend_time(id, 1.0);
            }
        }
    }

    /// Living enemies the creature can see or that hit it unseen this turn
    fn scan_enemies(&self, id: CreatureId) -> Vec<CreatureId> {
        let Some(me) = self.creatures.get(&id) else {
            return Vec::new();
        };
        let area = Rect::around(me.position(), SIGHT_RANGE);
        let mut found: Vec<CreatureId> = self
            .level
            .creatures_in(area)
            .into_iter()
            .filter(|other| *other != id && self.can_see(id, *other) && self.is_enemy(id, *other))
            .collect();
        for attacker in me.unknown_attackers() {
            if self.is_alive(*attacker) && !found.contains(attacker) {
                found.push(*attacker);
            }
        }
        found
    }

    /// Real-time upkeep of one creature: effect timeouts, poison, bleeding
    /// and falling apart.
    pub fn tick_creature(&mut self, id: CreatureId, real_time: f64) {
        let fall_apart = self.tuning.fall_apart_parts;
        let bleed_threshold = self.tuning.bleed_threshold;
        let bleed_rate = self.tuning.bleed_rate;
        let poison_bleed = self.tuning.poison_bleed;
        let Some(c) = self.creatures.get_mut(&id).filter(|c| !c.dead) else {
            return;
        };
        c.difficulty_points();
        let ended = c.expire_effects(real_time, &mut self.messages);
        if !ended.is_empty() {
            debug!(creature = %c.name, ?ended, "effects timed out");
        }
        let poisoned = c.is_affected(LastingEffect::Poison);
        if poisoned {
            c.bleed(poison_bleed);
            self.messages
                .private(c, "You feel poison flowing in your veins.");
        }
        let delta = (real_time - c.last_tick).max(0.0);
        c.last_tick = real_time;

        if c.flags.contains(CreatureFlags::NOT_LIVING) && c.body.total_damaged() >= fall_apart {
            self.messages.you(c, MsgType::FallApart, "");
            let killer = c.last_attacker.filter(|a| self.is_alive(*a));
            self.die(id, killer, true, true);
            return;
        }
        if c.is_bleeding(bleed_threshold) && c.is_living() {
            c.health -= delta * bleed_rate;
            if delta > 0.0 {
                self.messages.private(c, "You are bleeding.");
            }
        }
        if c.health <= 0.0 {
            let cause = if poisoned { "poisoning" } else { "bleeding" };
            self.messages.you(c, MsgType::DieOf, cause);
            debug!(creature = %c.name, cause, "died of wounds");
            let killer = c.last_attacker.filter(|a| self.is_alive(*a));
            self.die(id, killer, true, true);
        }
    }

    /// Advance the real-time clock and tick every living creature.
    pub fn tick(&mut self, real_time: f64) {
        self.real_time = self.real_time.max(real_time);
        for id in self.living() {
            self.tick_creature(id, self.real_time);
        }
    }

    /// The living creature due to act next: lowest time, ties by id
    pub fn next_actor(&self) -> Option<CreatureId> {
        self.creatures
            .values()
            .filter(|c| !c.dead)
            .min_by(|a, b| a.time.total_cmp(&b.time).then(a.id.cmp(&b.id)))
            .map(|c| c.id)
    }

    /// Let the next creature act. Returns who acted.
    pub fn step(&mut self) -> Option<CreatureId> {
        let id = self.next_actor()?;
        self.make_move(id);
        Some(id)
    }

    /// Alternate turns and ticks until every living creature's clock has
    /// passed `until`, or nobody is left.
    pub fn run_until(&mut self, until: f64) {
        while let Some(id) = self.next_actor() {
            let Some(time) = self.creatures.get(&id).map(|c| c.time) else {
                break;
            };
            if time >= until {
                break;
            }
            if time > self.real_time {
                self.tick(time);
            }
            if self.is_alive(id) {
                self.make_move(id);
            }
        }
        self.tick(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::{BodyPart, CreatureTemplate, TribeId};
    use crate::geom::Vec2;
    use crate::world::{CommandKind, GridLevel, MessageLog, NoOpController, ScriptedController};

    fn world() -> (World, TribeId) {
        let mut w = World::new(Box::new(GridLevel::new(10, 10)), 5);
        let tribe = w.add_tribe("folk");
        (w, tribe)
    }

    #[test]
    fn test_faster_creatures_act_more_often() {
        let (mut w, tribe) = world();
        let slow = w
            .spawn(
                CreatureTemplate::humanoid("tortoise", 10, 10, 50),
                tribe,
                Vec2::new(1, 1),
                Box::new(NoOpController),
            )
            .unwrap();
        let fast = w
            .spawn(
                CreatureTemplate::humanoid("hare", 10, 10, 200),
                tribe,
                Vec2::new(5, 5),
                Box::new(NoOpController),
            )
            .unwrap();
        let mut turns = (0, 0);
        for _ in 0..15 {
            match w.step() {
                Some(id) if id == slow => turns.0 += 1,
                Some(id) if id == fast => turns.1 += 1,
                _ => {}
            }
        }
        assert_eq!(turns, (3, 12));
        assert_eq!(w.creature(slow).unwrap().time(), 6.0);
    }

    #[test]
    fn test_scripted_moves_are_performed() {
        let (mut w, tribe) = world();
        let id = w
            .spawn(
                CreatureTemplate::humanoid("scout", 10, 10, 100),
                tribe,
                Vec2::new(1, 1),
                Box::new(ScriptedController::new([
                    CommandKind::Move(Vec2::new(1, 0)),
                    CommandKind::Move(Vec2::new(1, 1)),
                ])),
            )
            .unwrap();
        w.make_move(id);
        w.make_move(id);
        w.make_move(id);
        let c = w.creature(id).unwrap();
        assert_eq!(c.position(), Vec2::new(3, 2));
        assert_eq!(c.time(), 3.0);
    }

    #[test]
    fn test_refused_command_still_spends_turn() {
        let (mut w, tribe) = world();
        let id = w
            .spawn(
                CreatureTemplate::beast("dog", 10, 10, 100),
                tribe,
                Vec2::new(1, 1),
                Box::new(ScriptedController::new([CommandKind::PickUp(vec![])])),
            )
            .unwrap();
        w.make_move(id);
        assert_eq!(w.creature(id).unwrap().time(), 1.0);
        assert!(w.messages().contains("You can't pick up anything!"));
    }

    #[test]
    fn test_sleeping_creature_skips_turn() {
        let (mut w, tribe) = world();
        let id = w
            .spawn(
                CreatureTemplate::humanoid("sleeper", 10, 10, 100),
                tribe,
                Vec2::new(1, 1),
                Box::new(ScriptedController::new([CommandKind::Move(Vec2::new(1, 0))])),
            )
            .unwrap();
        let mut log = MessageLog::new();
        w.creature_mut(id)
            .unwrap()
            .add_effect(LastingEffect::Sleep, 5.0, false, &mut log);
        w.make_move(id);
        let c = w.creature(id).unwrap();
        assert_eq!(c.position(), Vec2::new(1, 1));
        assert_eq!(c.time(), 1.0);
    }

    #[test]
    #[should_panic(expected = "make_move on dead creature")]
    fn test_make_move_on_dead_panics() {
        let (mut w, tribe) = world();
        let id = w
            .spawn(
                CreatureTemplate::humanoid("corpse", 10, 10, 100),
                tribe,
                Vec2::new(1, 1),
                Box::new(NoOpController),
            )
            .unwrap();
        w.die(id, None, false, false);
        w.make_move(id);
    }

    #[test]
    fn test_visible_enemies_refreshed() {
        let (mut w, tribe) = world();
        let orcs = w.add_tribe("orcs");
        w.tribes_mut().make_enemies(tribe, orcs);
        let guard = w
            .spawn(
                CreatureTemplate::humanoid("guard", 10, 10, 100),
                tribe,
                Vec2::new(1, 1),
                Box::new(NoOpController),
            )
            .unwrap();
        let orc = w
            .spawn(
                CreatureTemplate::humanoid("orc", 10, 10, 100),
                orcs,
                Vec2::new(6, 6),
                Box::new(NoOpController),
            )
            .unwrap();
        w.spawn(
            CreatureTemplate::humanoid("friend", 10, 10, 100),
            tribe,
            Vec2::new(2, 2),
            Box::new(NoOpController),
        );
        w.make_move(guard);
        assert_eq!(w.creature(guard).unwrap().visible_enemies(), &[orc]);
    }

    #[test]
    fn test_bleeding_kills_over_time() {
        let (mut w, tribe) = world();
        let id = w
            .spawn(
                CreatureTemplate::humanoid("victim", 10, 10, 100),
                tribe,
                Vec2::new(1, 1),
                Box::new(NoOpController),
            )
            .unwrap();
        w.creature_mut(id).unwrap().bleed(0.9);
        w.tick(1.0);
        assert!(w.is_alive(id));
        assert!(w.messages().contains("You are bleeding."));
        w.tick(100.0);
        assert!(!w.is_alive(id));
        assert!(w.messages().contains("dies of bleeding"));
        assert!(w.creature(id).unwrap().health() >= 0.0);
    }

    #[test]
    fn test_poison_drains_health() {
        let (mut w, tribe) = world();
        let id = w
            .spawn(
                CreatureTemplate::humanoid("taster", 10, 10, 100),
                tribe,
                Vec2::new(1, 1),
                Box::new(NoOpController),
            )
            .unwrap();
        let mut log = MessageLog::new();
        w.creature_mut(id)
            .unwrap()
            .add_effect(LastingEffect::Poison, 50.0, false, &mut log);
        w.tick(1.0);
        let health = w.creature(id).unwrap().health();
        assert!(health < 1.0);
        assert!(w.messages().contains("poison flowing"));
    }

    #[test]
    fn test_golem_falls_apart() {
        let (mut w, tribe) = world();
        let id = w
            .spawn(
                CreatureTemplate::humanoid("golem", 20, 6, 60).with_flags(CreatureFlags::NOT_LIVING),
                tribe,
                Vec2::new(3, 3),
                Box::new(NoOpController),
            )
            .unwrap();
        for part in [BodyPart::Arm, BodyPart::Arm, BodyPart::Leg, BodyPart::Leg] {
            w.injure_body_part(id, part, false);
        }
        w.tick(1.0);
        assert!(!w.is_alive(id));
        assert!(w.messages().contains("falls apart"));
    }

    #[test]
    fn test_effects_expire_on_tick() {
        let (mut w, tribe) = world();
        let id = w
            .spawn(
                CreatureTemplate::humanoid("dreamer", 10, 10, 100),
                tribe,
                Vec2::new(1, 1),
                Box::new(NoOpController),
            )
            .unwrap();
        let mut log = MessageLog::new();
        w.creature_mut(id)
            .unwrap()
            .add_effect(LastingEffect::Sleep, 3.0, false, &mut log);
        w.tick(2.0);
        assert!(w.creature(id).unwrap().is_affected(LastingEffect::Sleep));
        w.tick(4.0);
        assert!(!w.creature(id).unwrap().is_affected(LastingEffect::Sleep));
    }

    #[test]
    fn test_run_until_stops_at_horizon() {
        let (mut w, tribe) = world();
        let a = w
            .spawn(
                CreatureTemplate::humanoid("a", 10, 10, 100),
                tribe,
                Vec2::new(1, 1),
                Box::new(NoOpController),
            )
            .unwrap();
        w.run_until(5.0);
        assert_eq!(w.creature(a).unwrap().time(), 5.0);
        assert_eq!(w.real_time(), 5.0);
    }
}

//! Health, bleeding and healing
//!
//! Health is normalized to `0.0..=1.0`. Bleeding may push it below zero for
//! the short span until the next death check resolves it.

use super::{BodyPart, Creature, CreatureFlags, LastingEffect};
use crate::consts::MEND_HEALTH;
use crate::world::{MessageLog, MsgType};

impl Creature {
    pub fn health(&self) -> f64 {
        self.health
    }

    /// Whether the creature is losing health over time
    pub fn is_bleeding(&self, threshold: f64) -> bool {
        self.health < threshold
    }

    pub fn bleed(&mut self, severity: f64) {
        self.health -= severity;
    }

    /// Heal by `amount`, never above full health. Injuries mend once the
    /// creature is back above half health; with `regrow` lost parts grow
    /// back too.
    pub fn heal(&mut self, amount: f64, regrow: bool, log: &mut MessageLog) {
        if self.health < 1.0 {
            self.health = (self.health + amount).min(1.0);
            if self.health >= MEND_HEALTH {
                for (part, _) in self.body.mend_injuries() {
                    log.you(self, MsgType::Your, format!("{part}s are back in shape"));
                }
                self.update_collapse(log);
            }
            if self.health >= 1.0 {
                log.you(self, MsgType::BleedingStops, "");
                self.health = 1.0;
                self.last_attacker = None;
            }
        }
        if regrow {
            for (part, n) in self.body.regrow() {
                let noun = if n > 1 || part == BodyPart::Leg || part == BodyPart::Arm {
                    format!("{part}s")
                } else {
                    part.to_string()
                };
                log.you(self, MsgType::Your, format!("{noun} grow back!"));
            }
            self.update_collapse(log);
        }
    }

    /// Burn for `6 * amount / STRENGTH`, unless fire resistant.
    pub fn set_on_fire(&mut self, amount: f64, log: &mut MessageLog) {
        if self.is_affected(LastingEffect::FireResistant)
            || self.flags.contains(CreatureFlags::FIRE_CREATURE)
        {
            return;
        }
        log.you(self, MsgType::Are, "burnt by the fire");
        let strength = self.attr(super::AttrType::Strength).max(1) as f64;
        self.bleed(6.0 * amount / strength);
    }

    /// Choke on poison gas for `amount / STRENGTH`, if breathing and living.
    pub fn poison_with_gas(&mut self, amount: f64, log: &mut MessageLog) {
        if !self.flags.contains(CreatureFlags::BREATHING) || !self.is_living() {
            return;
        }
        log.you(self, MsgType::Feel, "poisoned by the gas");
        let strength = self.attr(super::AttrType::Strength).max(1) as f64;
        self.bleed(amount / strength);
    }
}

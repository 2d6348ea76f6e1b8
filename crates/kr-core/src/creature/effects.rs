//! Lasting effects
//!
//! Each effect has a timed expiry and a permanent grant count. An effect is
//! active while its expiry has not passed or while at least one permanent
//! grant is held. Onset, removal and timeout are narrated separately.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};
use tracing::trace;

use super::Creature;
use crate::consts::FLYING_FALL_DAMAGE;
use crate::world::{MessageLog, MsgType};

/// Lasting effect kinds
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumCount,
)]
#[repr(u8)]
pub enum LastingEffect {
    Sleep = 0,
    Panic = 1,
    Rage = 2,
    Slowed = 3,
    StrBonus = 4,
    DexBonus = 5,
    Hallucination = 6,
    Blind = 7,
    Invisible = 8,
    Poison = 9,
    Entangled = 10,
    Stunned = 11,
    Speed = 12,
    PoisonResistant = 13,
    FireResistant = 14,
    Flying = 15,
    Insanity = 16,
    MagicShield = 17,
}

impl LastingEffect {
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short adjective shown in a creature description, if any
    pub const fn adjective(self) -> Option<&'static str> {
        match self {
            LastingEffect::Sleep => Some("sleeping"),
            LastingEffect::Panic => Some("panic"),
            LastingEffect::Rage => Some("enraged"),
            LastingEffect::Slowed => Some("slowed"),
            LastingEffect::StrBonus => Some("strength bonus"),
            LastingEffect::DexBonus => Some("dexterity bonus"),
            LastingEffect::Hallucination => Some("hallucinating"),
            LastingEffect::Blind => Some("blind"),
            LastingEffect::Invisible => Some("invisible"),
            LastingEffect::Poison => Some("poisoned"),
            LastingEffect::Entangled => Some("entangled"),
            LastingEffect::Stunned => Some("stunned"),
            LastingEffect::Speed => Some("speed bonus"),
            LastingEffect::PoisonResistant => Some("poison resistant"),
            LastingEffect::FireResistant => Some("fire resistant"),
            LastingEffect::Flying => Some("flying"),
            LastingEffect::Insanity => Some("insane"),
            LastingEffect::MagicShield => Some("magic shield"),
        }
    }
}

/// Expiry and permanent-grant tables for every effect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LastingEffects {
    /// Timed expiry per effect; 0 means no timed instance
    expiry: [f64; LastingEffect::COUNT],
    /// Permanent grant count per effect
    permanent: [i32; LastingEffect::COUNT],
}

impl LastingEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the effect is active at time `now`
    pub fn is_active(&self, effect: LastingEffect, now: f64) -> bool {
        let expiry = self.expiry[effect.index()];
        (expiry > 0.0 && expiry >= now) || self.permanent[effect.index()] > 0
    }

    pub fn expiry(&self, effect: LastingEffect) -> f64 {
        self.expiry[effect.index()]
    }

    pub fn set_expiry(&mut self, effect: LastingEffect, expiry: f64) {
        self.expiry[effect.index()] = expiry;
    }

    /// Pull the expiry earlier, never below zero.
    pub fn shorten(&mut self, effect: LastingEffect, by: f64) {
        let e = &mut self.expiry[effect.index()];
        *e = (*e - by).max(0.0);
    }

    pub fn permanent_count(&self, effect: LastingEffect) -> i32 {
        self.permanent[effect.index()]
    }

    pub fn is_permanent(&self, effect: LastingEffect) -> bool {
        self.permanent[effect.index()] > 0
    }

    pub fn add_permanent(&mut self, effect: LastingEffect) {
        self.permanent[effect.index()] += 1;
    }

    /// Drop one permanent grant.
    ///
    /// # Panics
    /// If no grant is held; an unbalanced removal is a logic error.
    pub fn remove_permanent(&mut self, effect: LastingEffect) {
        let count = &mut self.permanent[effect.index()];
        assert!(*count > 0, "removing permanent {effect} with no grant held");
        *count -= 1;
    }

    /// Effects with a timed expiry that has passed by `real_time`
    pub fn expired(&self, real_time: f64) -> Vec<LastingEffect> {
        LastingEffect::iter()
            .filter(|e| {
                let expiry = self.expiry[e.index()];
                expiry > 0.0 && expiry < real_time
            })
            .collect()
    }

    /// Effects currently active at `now`
    pub fn active(&self, now: f64) -> impl Iterator<Item = LastingEffect> + '_ {
        LastingEffect::iter().filter(move |e| self.is_active(*e, now))
    }
}

impl Creature {
    /// Whether the effect can take hold of this creature at all
    pub fn affects(&self, effect: LastingEffect) -> bool {
        match effect {
            LastingEffect::Rage | LastingEffect::Panic => !self.is_affected(LastingEffect::Sleep),
            LastingEffect::Poison => {
                !self.is_affected(LastingEffect::PoisonResistant) && self.is_living()
            }
            LastingEffect::Entangled => self.is_corporeal(),
            LastingEffect::Sleep
            | LastingEffect::Slowed
            | LastingEffect::StrBonus
            | LastingEffect::DexBonus
            | LastingEffect::Hallucination
            | LastingEffect::Blind
            | LastingEffect::Invisible
            | LastingEffect::Stunned
            | LastingEffect::Speed
            | LastingEffect::PoisonResistant
            | LastingEffect::FireResistant
            | LastingEffect::Flying
            | LastingEffect::Insanity
            | LastingEffect::MagicShield => true,
        }
    }

    pub fn is_affected(&self, effect: LastingEffect) -> bool {
        self.effects.is_active(effect, self.time)
    }

    /// Whether the effect is held through a permanent grant
    pub fn is_permanently_affected(&self, effect: LastingEffect) -> bool {
        self.effects.is_permanent(effect)
    }

    pub fn effects(&self) -> &LastingEffects {
        &self.effects
    }

    /// Time left on a timed effect.
    ///
    /// # Panics
    /// If the effect is not active.
    pub fn time_remaining(&self, effect: LastingEffect) -> f64 {
        assert!(self.is_affected(effect), "{effect} is not active");
        self.effects.expiry(effect) - self.time
    }

    /// Extend (never shorten) a timed effect to `now + duration`.
    pub fn add_effect(
        &mut self,
        effect: LastingEffect,
        duration: f64,
        announce: bool,
        log: &mut MessageLog,
    ) {
        let until = self.time + duration;
        if self.effects.expiry(effect) < until && self.affects(effect) {
            if !self.is_affected(effect) {
                self.on_affected(effect, announce, log);
            }
            trace!(creature = %self.name, %effect, until, "effect extended");
            self.effects.set_expiry(effect, until);
        }
    }

    /// Clear the timed part of an effect. Permanent grants are untouched.
    pub fn remove_effect(&mut self, effect: LastingEffect, announce: bool, log: &mut MessageLog) {
        if !self.is_affected(effect) {
            return;
        }
        self.effects.set_expiry(effect, 0.0);
        if !self.is_affected(effect) {
            self.on_removed(effect, announce, log);
        }
    }

    pub fn add_permanent_effect(&mut self, effect: LastingEffect, log: &mut MessageLog) {
        if !self.is_affected(effect) {
            self.on_affected(effect, true, log);
        }
        self.effects.add_permanent(effect);
    }

    pub fn remove_permanent_effect(
        &mut self,
        effect: LastingEffect,
        announce: bool,
        log: &mut MessageLog,
    ) {
        self.effects.remove_permanent(effect);
        if !self.is_affected(effect) {
            self.on_removed(effect, announce, log);
        }
    }

    /// Expire timed effects that ran out before `real_time`.
    ///
    /// Returns the effects that became inactive.
    pub(crate) fn expire_effects(
        &mut self,
        real_time: f64,
        log: &mut MessageLog,
    ) -> Vec<LastingEffect> {
        let mut ended = Vec::new();
        for effect in self.effects.expired(real_time) {
            self.effects.set_expiry(effect, 0.0);
            if !self.is_affected(effect) {
                self.on_timed_out(effect, true, log);
                ended.push(effect);
            }
        }
        ended
    }

    fn on_affected(&mut self, effect: LastingEffect, announce: bool, log: &mut MessageLog) {
        match effect {
            LastingEffect::Flying => {
                if announce {
                    log.you(self, MsgType::Are, "flying!");
                }
            }
            LastingEffect::Stunned => {
                if announce {
                    log.you(self, MsgType::Are, "stunned");
                }
            }
            LastingEffect::Panic => {
                self.remove_effect(LastingEffect::Rage, false, log);
                if announce {
                    log.you(self, MsgType::Panic, "");
                }
            }
            LastingEffect::Rage => {
                self.remove_effect(LastingEffect::Panic, false, log);
                if announce {
                    log.you(self, MsgType::Rage, "");
                }
            }
            LastingEffect::Hallucination => {
                if announce {
                    log.private(self, "The world explodes into colors!");
                }
            }
            LastingEffect::Blind => {
                if announce {
                    log.you(self, MsgType::Are, "blind!");
                }
            }
            LastingEffect::Invisible => {
                if announce {
                    log.you(self, MsgType::TurnInvisible, "");
                }
            }
            LastingEffect::Poison => {
                if announce {
                    log.you(self, MsgType::Are, "poisoned");
                }
            }
            LastingEffect::StrBonus => {
                if announce {
                    log.you(self, MsgType::Feel, "stronger");
                }
            }
            LastingEffect::DexBonus => {
                if announce {
                    log.you(self, MsgType::Feel, "more agile");
                }
            }
            LastingEffect::Speed => {
                self.remove_effect(LastingEffect::Slowed, false, log);
                if announce {
                    log.you(self, MsgType::Are, "moving faster");
                }
            }
            LastingEffect::Slowed => {
                self.remove_effect(LastingEffect::Speed, false, log);
                if announce {
                    log.you(self, MsgType::Are, "moving more slowly");
                }
            }
            LastingEffect::Entangled => {
                if announce {
                    log.you(self, MsgType::Are, "caught in a web");
                }
            }
            LastingEffect::Sleep => {
                if announce {
                    log.you(self, MsgType::FallAsleep, "");
                }
            }
            LastingEffect::PoisonResistant => {
                self.remove_effect(LastingEffect::Poison, true, log);
                if announce {
                    log.you(self, MsgType::Are, "now poison resistant");
                }
            }
            LastingEffect::FireResistant => {
                if announce {
                    log.you(self, MsgType::Are, "now fire resistant");
                }
            }
            LastingEffect::Insanity => {
                if announce {
                    log.you(self, MsgType::Become, "insane");
                }
            }
            LastingEffect::MagicShield => {
                if announce {
                    log.you(self, MsgType::Feel, "protected");
                }
            }
        }
    }

    fn on_removed(&mut self, effect: LastingEffect, announce: bool, log: &mut MessageLog) {
        match effect {
            LastingEffect::Poison => {
                if announce {
                    log.you(self, MsgType::Are, "cured from poisoning");
                }
            }
            LastingEffect::Sleep
            | LastingEffect::Panic
            | LastingEffect::Rage
            | LastingEffect::Slowed
            | LastingEffect::StrBonus
            | LastingEffect::DexBonus
            | LastingEffect::Hallucination
            | LastingEffect::Blind
            | LastingEffect::Invisible
            | LastingEffect::Entangled
            | LastingEffect::Stunned
            | LastingEffect::Speed
            | LastingEffect::PoisonResistant
            | LastingEffect::FireResistant
            | LastingEffect::Flying
            | LastingEffect::Insanity
            | LastingEffect::MagicShield => self.on_timed_out(effect, announce, log),
        }
    }

    fn on_timed_out(&mut self, effect: LastingEffect, announce: bool, log: &mut MessageLog) {
        if !announce {
            if effect == LastingEffect::Flying {
                self.bleed(FLYING_FALL_DAMAGE);
            }
            return;
        }
        match effect {
            LastingEffect::Slowed => log.you(self, MsgType::Are, "moving faster again"),
            LastingEffect::Sleep => log.you(self, MsgType::WakeUp, ""),
            LastingEffect::Speed => log.you(self, MsgType::Are, "moving more slowly again"),
            LastingEffect::StrBonus => log.you(self, MsgType::Are, "weaker again"),
            LastingEffect::DexBonus => log.you(self, MsgType::Are, "less agile again"),
            LastingEffect::Panic | LastingEffect::Rage | LastingEffect::Hallucination => {
                log.private(self, "Your mind is clear again")
            }
            LastingEffect::Entangled => log.you(self, MsgType::BreakFree, "the web"),
            LastingEffect::Stunned => log.you(self, MsgType::Are, "no longer stunned"),
            LastingEffect::Blind => log.you(self, MsgType::Are, "can see again"),
            LastingEffect::Invisible => log.you(self, MsgType::TurnVisible, ""),
            LastingEffect::Poison => log.you(self, MsgType::Are, "no longer poisoned"),
            LastingEffect::PoisonResistant => {
                log.you(self, MsgType::Are, "no longer poison resistant")
            }
            LastingEffect::FireResistant => log.you(self, MsgType::Are, "no longer fire resistant"),
            LastingEffect::Flying => {
                log.you(self, MsgType::Fall, "floor");
                self.bleed(FLYING_FALL_DAMAGE);
            }
            LastingEffect::Insanity => log.you(self, MsgType::Become, "sane again"),
            LastingEffect::MagicShield => log.you(self, MsgType::Feel, "less protected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::CreatureTemplate;

    fn goblin() -> Creature {
        Creature::for_tests(CreatureTemplate::humanoid("goblin", 12, 12, 100))
    }

    #[test]
    fn test_table_inactive_by_default() {
        let table = LastingEffects::new();
        for effect in LastingEffect::iter() {
            assert!(!table.is_active(effect, 0.0));
            assert!(!table.is_active(effect, 10.0));
        }
    }

    #[test]
    fn test_table_expiry_boundary() {
        let mut table = LastingEffects::new();
        table.set_expiry(LastingEffect::Blind, 10.0);
        assert!(table.is_active(LastingEffect::Blind, 10.0));
        assert!(!table.is_active(LastingEffect::Blind, 10.5));
        assert_eq!(table.expired(10.0), vec![]);
        assert_eq!(table.expired(11.0), vec![LastingEffect::Blind]);
    }

    #[test]
    #[should_panic]
    fn test_remove_permanent_underflow_panics() {
        let mut table = LastingEffects::new();
        table.remove_permanent(LastingEffect::Flying);
    }

    #[test]
    fn test_add_effect_never_shortens() {
        let mut c = goblin();
        let mut log = MessageLog::new();
        c.add_effect(LastingEffect::Blind, 20.0, true, &mut log);
        c.add_effect(LastingEffect::Blind, 5.0, true, &mut log);
        assert_eq!(c.effects().expiry(LastingEffect::Blind), 20.0);
        assert_eq!(log.iter().filter(|m| m.mentions("blind")).count(), 1);
    }

    #[test]
    fn test_rage_clears_panic() {
        let mut c = goblin();
        let mut log = MessageLog::new();
        c.add_effect(LastingEffect::Panic, 10.0, true, &mut log);
        c.add_effect(LastingEffect::Rage, 10.0, true, &mut log);
        assert!(c.is_affected(LastingEffect::Rage));
        assert!(!c.is_affected(LastingEffect::Panic));
    }

    #[test]
    fn test_speed_and_slowed_exclusive() {
        let mut c = goblin();
        let mut log = MessageLog::new();
        c.add_effect(LastingEffect::Slowed, 10.0, true, &mut log);
        c.add_effect(LastingEffect::Speed, 10.0, true, &mut log);
        assert!(c.is_affected(LastingEffect::Speed));
        assert!(!c.is_affected(LastingEffect::Slowed));
        c.add_effect(LastingEffect::Slowed, 10.0, true, &mut log);
        assert!(!c.is_affected(LastingEffect::Speed));
    }

    #[test]
    fn test_no_rage_while_asleep() {
        let mut c = goblin();
        let mut log = MessageLog::new();
        c.add_effect(LastingEffect::Sleep, 10.0, true, &mut log);
        c.add_effect(LastingEffect::Rage, 10.0, true, &mut log);
        assert!(!c.is_affected(LastingEffect::Rage));
    }

    #[test]
    fn test_permanent_outlives_timed_removal() {
        let mut c = goblin();
        let mut log = MessageLog::new();
        c.add_permanent_effect(LastingEffect::Flying, &mut log);
        c.add_effect(LastingEffect::Flying, 5.0, true, &mut log);
        c.remove_effect(LastingEffect::Flying, true, &mut log);
        assert!(c.is_affected(LastingEffect::Flying));
        c.remove_permanent_effect(LastingEffect::Flying, true, &mut log);
        assert!(!c.is_affected(LastingEffect::Flying));
    }

    #[test]
    fn test_poison_resistance_cures_poison() {
        let mut c = goblin();
        let mut log = MessageLog::new();
        c.add_effect(LastingEffect::Poison, 30.0, true, &mut log);
        assert!(c.is_affected(LastingEffect::Poison));
        c.add_permanent_effect(LastingEffect::PoisonResistant, &mut log);
        assert!(!c.is_affected(LastingEffect::Poison));
        assert!(log.contains("cured from poisoning"));
        c.add_effect(LastingEffect::Poison, 30.0, true, &mut log);
        assert!(!c.is_affected(LastingEffect::Poison));
    }

    #[test]
    fn test_expire_reports_and_narrates() {
        let mut c = goblin();
        let mut log = MessageLog::new();
        c.add_effect(LastingEffect::Stunned, 3.0, true, &mut log);
        assert!(c.expire_effects(3.0, &mut log).is_empty());
        let ended = c.expire_effects(4.0, &mut log);
        assert_eq!(ended, vec![LastingEffect::Stunned]);
        assert!(log.contains("no longer stunned"));
    }

    #[test]
    fn test_time_remaining() {
        let mut c = goblin();
        let mut log = MessageLog::new();
        c.add_effect(LastingEffect::Hallucination, 12.0, true, &mut log);
        assert_eq!(c.time_remaining(LastingEffect::Hallucination), 12.0);
    }
}

//! Creature morale
//!
//! Morale is a value in `-1.0..=1.0`. Pluggable overrides are consulted in
//! order and the first one that answers wins over the stored value.

use std::fmt;

use super::{Creature, LastingEffect};

/// Replaces a creature's stored morale while it applies
pub trait MoraleOverride: fmt::Debug {
    /// `Some` to override, `None` to defer to the next source
    fn morale(&self, creature: &Creature) -> Option<f64>;
}

/// Always reports the same morale
#[derive(Debug, Clone, Copy)]
pub struct FixedMorale(pub f64);

impl MoraleOverride for FixedMorale {
    fn morale(&self, _creature: &Creature) -> Option<f64> {
        Some(self.0)
    }
}

/// Reports a fixed morale while an effect is active
#[derive(Debug, Clone, Copy)]
pub struct EffectMorale {
    pub effect: LastingEffect,
    pub value: f64,
}

impl MoraleOverride for EffectMorale {
    fn morale(&self, creature: &Creature) -> Option<f64> {
        creature.is_affected(self.effect).then_some(self.value)
    }
}

impl Creature {
    /// Effective morale
    pub fn morale(&self) -> f64 {
        self.morale_overrides
            .iter()
            .find_map(|o| o.morale(self))
            .unwrap_or(self.morale)
            .clamp(-1.0, 1.0)
    }

    /// Stored morale, ignoring overrides
    pub fn base_morale(&self) -> f64 {
        self.morale
    }

    pub fn add_morale(&mut self, delta: f64) {
        self.morale = (self.morale + delta).clamp(-1.0, 1.0);
    }

    pub fn add_morale_override(&mut self, over: Box<dyn MoraleOverride>) {
        self.morale_overrides.push(over);
    }
}

//! Effects carried by attacks and passive defenses
//!
//! An attack or a passive defense names an [`EffectType`]; the strength at
//! which it lands depends on how it was delivered.

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::debug;

use crate::creature::{CreatureFlags, CreatureId, LastingEffect};
use crate::world::World;

/// What an effect does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum EffectType {
    /// Grants a timed lasting effect
    Lasting(LastingEffect),
    Heal,
    Fire,
    PoisonGas,
}

/// How strongly an effect lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum EffectStrength {
    /// Riding on a damaging hit
    Weak,
    /// Passive defenses and harmless hits
    Normal,
    Strong,
}

impl EffectStrength {
    /// Duration of a lasting effect
    pub const fn duration(self) -> f64 {
        match self {
            EffectStrength::Weak => 15.0,
            EffectStrength::Normal => 40.0,
            EffectStrength::Strong => 160.0,
        }
    }

    pub const fn heal_amount(self) -> f64 {
        match self {
            EffectStrength::Weak => 0.33,
            EffectStrength::Normal | EffectStrength::Strong => 1.0,
        }
    }

    /// Amount of fire or gas
    pub const fn amount(self) -> f64 {
        match self {
            EffectStrength::Weak => 0.5,
            EffectStrength::Normal => 1.0,
            EffectStrength::Strong => 2.0,
        }
    }
}

impl World {
    /// Apply an effect to a living creature. Does nothing for dead or
    /// unknown ids.
    pub fn apply_effect(&mut self, target: CreatureId, effect: EffectType, strength: EffectStrength) {
        let Some(c) = self.creatures.get_mut(&target).filter(|c| !c.is_dead()) else {
            return;
        };
        debug!(creature = %c.name, %effect, %strength, "effect applied");
        match effect {
            EffectType::Lasting(LastingEffect::Sleep)
                if c.flags.contains(CreatureFlags::NO_SLEEP) => {}
            EffectType::Lasting(lasting) => {
                c.add_effect(lasting, strength.duration(), true, &mut self.messages);
            }
            EffectType::Heal => {
                c.heal(
                    strength.heal_amount(),
                    strength == EffectStrength::Strong,
                    &mut self.messages,
                );
            }
            EffectType::Fire => c.set_on_fire(strength.amount(), &mut self.messages),
            EffectType::PoisonGas => c.poison_with_gas(strength.amount(), &mut self.messages),
        }
    }
}

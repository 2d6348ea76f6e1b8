//! Combat system
//!
//! Melee between creatures: building an attack from the attacker's
//! modifiers, the defender's dodge, and damage resolution down to body-part
//! injuries, effects and death.

mod attack_type;
mod effect;
mod hit_message;
mod resolve;

pub use attack_type::{AttackLevel, AttackType};
pub use effect::{EffectStrength, EffectType};
pub use hit_message::injury_message;

use serde::{Deserialize, Serialize};

use crate::creature::{BodyPart, CreatureId};

/// A single blow, fully rolled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    /// `None` for blows with no creature behind them
    pub attacker: Option<CreatureId>,
    pub level: AttackLevel,
    pub attack_type: AttackType,
    pub accuracy: i32,
    pub strength: i32,
    /// Delivered by an attacker the defender could not see
    pub backstab: bool,
    /// Effect riding on the blow
    pub effect: Option<EffectType>,
}

impl Attack {
    pub fn new(
        attacker: Option<CreatureId>,
        level: AttackLevel,
        attack_type: AttackType,
        accuracy: i32,
        strength: i32,
    ) -> Self {
        Self {
            attacker,
            level,
            attack_type,
            accuracy,
            strength,
            backstab: false,
            effect: None,
        }
    }

    pub fn with_backstab(mut self) -> Self {
        self.backstab = true;
        self
    }

    pub fn with_effect(mut self, effect: Option<EffectType>) -> Self {
        self.effect = effect;
        self
    }
}

/// What a blow did to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitOutcome {
    Dodged,
    /// Strength did not beat defense
    NoDamage,
    /// Health lost, no body part injured
    Wounded,
    Injured(BodyPart),
    Killed,
    /// The attacker gave its life to drive the target mad
    Possessed,
    /// Swallowed whole
    Devoured,
    /// An incorporeal target dissolved
    Dissipated,
}

impl HitOutcome {
    pub const fn is_fatal(self) -> bool {
        matches!(
            self,
            HitOutcome::Killed | HitOutcome::Devoured | HitOutcome::Dissipated
        )
    }
}

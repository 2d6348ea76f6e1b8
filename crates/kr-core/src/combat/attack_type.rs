//! Attack types and heights
//!
//! The attack type says HOW a blow is delivered; the level says where it is
//! aimed.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Attack type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum AttackType {
    Cut = 0,
    Stab = 1,
    Crush = 2,
    Punch = 3,
    Bite = 4,
    /// Bite that may swallow a smaller victim whole
    Eat = 5,
    #[default]
    Hit = 6,
    Shoot = 7,
    /// Magic; never lands on a body part
    Spell = 8,
    /// Takes over the victim's mind at the cost of the attacker's life
    Possess = 9,
}

impl AttackType {
    /// Whether a hit can cut a body part clean off
    pub const fn severs(self) -> bool {
        matches!(self, AttackType::Cut | AttackType::Bite)
    }

    /// Whether a creature can deliver this without a weapon
    pub const fn is_barehanded(self) -> bool {
        matches!(
            self,
            AttackType::Punch
                | AttackType::Bite
                | AttackType::Eat
                | AttackType::Hit
                | AttackType::Possess
        )
    }

    /// Noun used in "no damage" messages
    pub const fn param(self) -> &'static str {
        match self {
            AttackType::Cut => "cut",
            AttackType::Stab => "stab",
            AttackType::Crush => "crush",
            AttackType::Punch => "punch",
            AttackType::Bite | AttackType::Eat => "bite",
            AttackType::Hit => "hit",
            AttackType::Shoot => "shot",
            AttackType::Spell => "spell",
            AttackType::Possess => "touch",
        }
    }
}

/// Height an attack is aimed at
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum AttackLevel {
    Low = 0,
    Middle = 1,
    High = 2,
}

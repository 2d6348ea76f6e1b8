//! Effective attributes and combat modifiers
//!
//! Raw attributes are the template values plus accumulated growth. The
//! effective value folds in equipment, wounds, effects and load; the combat
//! modifiers are derived from those.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

use super::{BodyPart, Creature, CreatureFlags, LastingEffect};
use crate::consts::{
    ATTR_BONUS, MAGIC_SHIELD_DEFENSE, SIMUL_ATTACK_PENALTY, SLEEP_DEFENSE_MULT,
    UNLIMITED_INVENTORY,
};

/// Primary attributes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
#[repr(u8)]
pub enum AttrType {
    Strength = 0,
    Dexterity = 1,
    Speed = 2,
}

impl AttrType {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Derived combat modifiers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
#[repr(u8)]
pub enum ModifierType {
    Damage = 0,
    Accuracy = 1,
    ThrownDamage = 2,
    ThrownAccuracy = 3,
    FiredDamage = 4,
    FiredAccuracy = 5,
    Defense = 6,
    InvLimit = 7,
}

impl ModifierType {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Strength and dexterity lost to being swarmed this turn
pub fn simul_attack_penalty(attacks_this_turn: u32) -> i32 {
    (attacks_this_turn as i32 - 1).max(0) * SIMUL_ATTACK_PENALTY
}

impl Creature {
    /// Template value plus accumulated growth
    pub fn raw_attr(&self, kind: AttrType) -> f64 {
        self.attr[kind.index()] as f64 + self.attr_increase[kind.index()]
    }

    /// Effective attribute value after every adjustment
    pub fn attr(&self, kind: AttrType) -> i32 {
        let mut def = self.raw_attr(kind) as i32 + self.equipment.attr_bonus(kind);
        match kind {
            AttrType::Strength | AttrType::Dexterity => {
                if self.health < 1.0 {
                    def = (def as f64 * (0.666 + self.health / 3.0)) as i32;
                }
                let boost = if kind == AttrType::Strength {
                    LastingEffect::StrBonus
                } else {
                    LastingEffect::DexBonus
                };
                if self.is_affected(boost) {
                    def += ATTR_BONUS;
                }
                for part in BodyPart::iter() {
                    def -= part.attr_penalty(kind) * self.body.damaged(part);
                }
                def -= simul_attack_penalty(self.attacks_this_turn);
            }
            AttrType::Speed => {
                let load = self.equipment.total_weight();
                if !self.flags.contains(CreatureFlags::CARRY_ANYTHING)
                    && def > 0
                    && load > self.attr(AttrType::Strength) as f64
                {
                    def = (def as f64 - 20.0 * load / def as f64) as i32;
                }
                if self.is_affected(LastingEffect::Slowed) {
                    def = (def as f64 / 1.5) as i32;
                }
                if self.is_affected(LastingEffect::Speed) {
                    def = (def as f64 * 1.5) as i32;
                }
            }
        }
        def
    }

    /// Penalty for wielding a weapon heavier than this creature can handle
    fn accuracy_bonus(&self) -> i32 {
        match self.weapon() {
            Some(w) => -(w.min_strength - self.attr(AttrType::Strength)).max(0),
            None => 0,
        }
    }

    /// Combat modifier, never negative
    pub fn modifier(&self, kind: ModifierType) -> i32 {
        let weapon = self.weapon();
        let mut def = self.equipment.modifier_bonus(kind) + self.skills.modifier_bonus(kind, weapon);
        let rage = self.is_affected(LastingEffect::Rage);
        let panic = self.is_affected(LastingEffect::Panic);
        match kind {
            ModifierType::FiredDamage | ModifierType::ThrownDamage => {
                def += self.attr(AttrType::Dexterity);
                if panic {
                    def -= ATTR_BONUS;
                }
                if rage {
                    def += ATTR_BONUS;
                }
            }
            ModifierType::Damage => {
                def += self.attr(AttrType::Strength);
                if weapon.is_none() {
                    def += self.barehanded_damage;
                }
                if panic {
                    def -= ATTR_BONUS;
                }
                if rage {
                    def += ATTR_BONUS;
                }
            }
            ModifierType::Defense => {
                def += self.attr(AttrType::Strength);
                if panic {
                    def += ATTR_BONUS;
                }
                if rage {
                    def -= ATTR_BONUS;
                }
                if self.is_affected(LastingEffect::Sleep) {
                    def = (def as f64 * SLEEP_DEFENSE_MULT) as i32;
                }
                if self.is_affected(LastingEffect::MagicShield) {
                    def += MAGIC_SHIELD_DEFENSE;
                }
            }
            ModifierType::FiredAccuracy | ModifierType::ThrownAccuracy => {
                def += self.attr(AttrType::Dexterity);
            }
            ModifierType::Accuracy => {
                def += self.accuracy_bonus() + self.attr(AttrType::Dexterity);
                if self.is_affected(LastingEffect::Sleep) {
                    def = 0;
                }
            }
            ModifierType::InvLimit => {
                if self.flags.contains(CreatureFlags::CARRY_ANYTHING) {
                    return UNLIMITED_INVENTORY;
                }
                return (self.attr(AttrType::Strength) * 2).max(0);
            }
        }
        def.max(0)
    }

    /// Attacks absorbed since this creature last acted
    pub fn attacks_this_turn(&self) -> u32 {
        self.attacks_this_turn
    }
}

//! Creature skills
//!
//! Discrete skills are either held or not. Continuous skills carry a level in
//! `0.0..=1.0` that feeds into combat modifiers.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use super::ModifierType;
use crate::object::Item;

/// Skill identifiers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum SkillId {
    /// Sneak attacks and hiding
    Ambush = 0,
    /// Can absorb traits of friendly creatures
    Consumption = 1,
    /// Can heal other creatures
    Healing = 2,
    Swimming = 3,
    NightVision = 4,
    ElfVision = 5,
    /// Accuracy with any melee weapon
    WeaponMelee = 10,
    /// Damage and accuracy with two-handed weapons
    TwoHandedWeapon = 11,
    KnifeThrowing = 12,
    Archery = 13,
}

impl SkillId {
    pub const fn is_discrete(self) -> bool {
        (self as u8) < 10
    }

    /// Whether the skill can pass to a consumer
    pub const fn transfers_on_consumption(self) -> bool {
        match self {
            SkillId::Consumption => false,
            SkillId::Ambush
            | SkillId::Healing
            | SkillId::Swimming
            | SkillId::NightVision
            | SkillId::ElfVision => true,
            SkillId::WeaponMelee
            | SkillId::TwoHandedWeapon
            | SkillId::KnifeThrowing
            | SkillId::Archery => false,
        }
    }

    /// Modifier bonus at skill level `value`
    pub fn modifier_bonus(self, value: f64, kind: ModifierType, weapon: Option<&Item>) -> i32 {
        let bonus = (value * 10.0).round() as i32;
        match (self, kind) {
            (SkillId::WeaponMelee, ModifierType::Accuracy) if weapon.is_some() => bonus,
            (SkillId::TwoHandedWeapon, ModifierType::Accuracy | ModifierType::Damage)
                if weapon.is_some_and(|w| w.two_handed) =>
            {
                bonus
            }
            (SkillId::KnifeThrowing, ModifierType::ThrownAccuracy | ModifierType::ThrownDamage) => {
                bonus
            }
            (SkillId::Archery, ModifierType::FiredAccuracy | ModifierType::FiredDamage) => bonus,
            _ => 0,
        }
    }
}

/// A creature's skills and their levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skillset {
    levels: HashMap<SkillId, f64>,
}

impl Skillset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, skill: SkillId, value: f64) -> Self {
        self.insert(skill, value);
        self
    }

    /// Set a skill level, clamped to `0.0..=1.0`
    pub fn insert(&mut self, skill: SkillId, value: f64) {
        self.levels.insert(skill, value.clamp(0.0, 1.0));
    }

    pub fn has(&self, skill: SkillId) -> bool {
        self.level(skill) > 0.0
    }

    pub fn level(&self, skill: SkillId) -> f64 {
        self.levels.get(&skill).copied().unwrap_or(0.0)
    }

    /// Sum of skill bonuses for one modifier
    pub fn modifier_bonus(&self, kind: ModifierType, weapon: Option<&Item>) -> i32 {
        SkillId::iter()
            .map(|s| s.modifier_bonus(self.level(s), kind, weapon))
            .sum()
    }

    /// Discrete skills that can pass to a consumer
    pub fn transferable(&self) -> Vec<SkillId> {
        SkillId::iter()
            .filter(|s| s.is_discrete() && s.transfers_on_consumption() && self.has(*s))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillId, f64)> + '_ {
        self.levels.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::AttackType;
    use crate::object::ItemId;

    #[test]
    fn test_level_clamped() {
        let skills = Skillset::new().with(SkillId::Archery, 3.0);
        assert_eq!(skills.level(SkillId::Archery), 1.0);
        assert_eq!(skills.level(SkillId::Ambush), 0.0);
    }

    #[test]
    fn test_two_handed_needs_two_handed_weapon() {
        let skills = Skillset::new().with(SkillId::TwoHandedWeapon, 0.5);
        let dagger = Item::weapon(ItemId(1), "dagger", AttackType::Stab, 2);
        let axe = Item::weapon(ItemId(2), "battle axe", AttackType::Cut, 8).two_handed();
        assert_eq!(skills.modifier_bonus(ModifierType::Damage, Some(&dagger)), 0);
        assert_eq!(skills.modifier_bonus(ModifierType::Damage, Some(&axe)), 5);
    }

    #[test]
    fn test_transferable_skips_consumption() {
        let skills = Skillset::new()
            .with(SkillId::Consumption, 1.0)
            .with(SkillId::NightVision, 1.0)
            .with(SkillId::Archery, 1.0);
        assert_eq!(skills.transferable(), vec![SkillId::NightVision]);
    }
}

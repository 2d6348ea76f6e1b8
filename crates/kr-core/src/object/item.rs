use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

use super::EquipmentSlot;
use crate::combat::{AttackType, EffectType};
use crate::creature::{AttrType, ModifierType};

/// Item identifier, unique within a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// Item classes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
#[repr(u8)]
pub enum ItemClass {
    Weapon = 0,
    Armor = 1,
    Amulet = 2,
    Ring = 3,
    Corpse = 4,
    /// Severed limbs, skulls, bones
    BodyPart = 5,
    #[default]
    Other = 6,
}

/// A carried or dropped item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub class: ItemClass,
    pub weight: f64,
    /// Where it goes when equipped; `None` if it cannot be equipped
    pub slot: Option<EquipmentSlot>,
    /// Attack delivered when wielded
    pub attack_type: AttackType,
    /// Strength below which the wielder loses accuracy
    pub min_strength: i32,
    pub two_handed: bool,
    /// Effect carried by hits with this weapon
    pub attack_effect: Option<EffectType>,
    /// Attribute bonuses while equipped
    pub attrs: [i32; AttrType::COUNT],
    /// Modifier bonuses while equipped
    pub modifiers: [i32; ModifierType::COUNT],
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            class: ItemClass::Other,
            weight: 1.0,
            slot: None,
            attack_type: AttackType::Hit,
            min_strength: 0,
            two_handed: false,
            attack_effect: None,
            attrs: [0; AttrType::COUNT],
            modifiers: [0; ModifierType::COUNT],
        }
    }

    /// Melee weapon adding `damage` to DAMAGE
    pub fn weapon(
        id: ItemId,
        name: impl Into<String>,
        attack_type: AttackType,
        damage: i32,
    ) -> Self {
        let mut item = Self::new(id, name);
        item.class = ItemClass::Weapon;
        item.weight = 5.0;
        item.slot = Some(EquipmentSlot::Weapon);
        item.attack_type = attack_type;
        item.modifiers[ModifierType::Damage.index()] = damage;
        item
    }

    /// Armor piece adding `defense` to DEFENSE
    pub fn armor(
        id: ItemId,
        name: impl Into<String>,
        slot: EquipmentSlot,
        defense: i32,
    ) -> Self {
        let mut item = Self::new(id, name);
        item.class = ItemClass::Armor;
        item.weight = 10.0;
        item.slot = Some(slot);
        item.modifiers[ModifierType::Defense.index()] = defense;
        item
    }

    pub fn corpse(id: ItemId, name: impl Into<String>, weight: f64) -> Self {
        let mut item = Self::new(id, name);
        item.class = ItemClass::Corpse;
        item.weight = weight;
        item
    }

    pub fn severed(id: ItemId, name: impl Into<String>, weight: f64) -> Self {
        let mut item = Self::new(id, name);
        item.class = ItemClass::BodyPart;
        item.weight = weight;
        item
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_min_strength(mut self, min_strength: i32) -> Self {
        self.min_strength = min_strength;
        self
    }

    pub fn two_handed(mut self) -> Self {
        self.two_handed = true;
        self
    }

    pub fn with_attack_effect(mut self, effect: EffectType) -> Self {
        self.attack_effect = Some(effect);
        self
    }

    pub fn with_attr(mut self, kind: AttrType, bonus: i32) -> Self {
        self.attrs[kind.index()] = bonus;
        self
    }

    pub fn with_modifier(mut self, kind: ModifierType, bonus: i32) -> Self {
        self.modifiers[kind.index()] = bonus;
        self
    }

    pub fn can_equip(&self) -> bool {
        self.slot.is_some()
    }

    /// "a sword" / "an axe"
    pub fn a_name(&self) -> String {
        match self.name.chars().next() {
            Some(c) if "aeiouAEIOU".contains(c) => format!("an {}", self.name),
            _ => format!("a {}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_defaults() {
        let sword = Item::weapon(ItemId(3), "sword", AttackType::Cut, 4);
        assert_eq!(sword.class, ItemClass::Weapon);
        assert_eq!(sword.slot, Some(EquipmentSlot::Weapon));
        assert_eq!(sword.modifiers[ModifierType::Damage.index()], 4);
        assert!(sword.can_equip());
    }

    #[test]
    fn test_a_name() {
        assert_eq!(Item::new(ItemId(1), "axe").a_name(), "an axe");
        assert_eq!(Item::new(ItemId(2), "club").a_name(), "a club");
    }
}

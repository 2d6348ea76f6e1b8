//! Carried items and what is worn or wielded

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use thiserror::Error;

use super::{Item, ItemId};
use crate::creature::{AttrType, ModifierType};

/// Equipment slots
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum EquipmentSlot {
    Weapon = 0,
    Helmet = 1,
    BodyArmor = 2,
    Gloves = 3,
    Boots = 4,
    Amulet = 5,
    Ring = 6,
}

impl EquipmentSlot {
    /// How many items the slot holds at once
    pub const fn capacity(self) -> usize {
        match self {
            EquipmentSlot::Ring => 2,
            EquipmentSlot::Weapon
            | EquipmentSlot::Helmet
            | EquipmentSlot::BodyArmor
            | EquipmentSlot::Gloves
            | EquipmentSlot::Boots
            | EquipmentSlot::Amulet => 1,
        }
    }
}

/// Equipment errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquipError {
    #[error("item is not carried")]
    NotCarried,

    #[error("this item can't be equipped")]
    NotEquipable,

    #[error("this slot is already equipped")]
    SlotTaken,

    #[error("this item is not equipped")]
    NotEquipped,
}

/// Inventory plus the subset of it that is equipped
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    items: Vec<Item>,
    equipped: Vec<ItemId>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Take an item out of the inventory, unequipping it first.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        self.equipped.retain(|e| *e != id);
        Some(self.items.remove(idx))
    }

    /// Empty the inventory.
    pub fn take_all(&mut self) -> Vec<Item> {
        self.equipped.clear();
        std::mem::take(&mut self.items)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_equipped(&self, id: ItemId) -> bool {
        self.equipped.contains(&id)
    }

    pub fn equipped(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| self.equipped.contains(&i.id))
    }

    fn slot_used(&self, slot: EquipmentSlot) -> usize {
        self.equipped().filter(|i| i.slot == Some(slot)).count()
    }

    /// Whether the item's slot has room
    pub fn can_equip(&self, item: &Item) -> bool {
        match item.slot {
            Some(slot) => self.slot_used(slot) < slot.capacity(),
            None => false,
        }
    }

    pub fn equip(&mut self, id: ItemId) -> Result<(), EquipError> {
        let item = self.get(id).ok_or(EquipError::NotCarried)?;
        if !item.can_equip() {
            return Err(EquipError::NotEquipable);
        }
        if self.is_equipped(id) || !self.can_equip(item) {
            return Err(EquipError::SlotTaken);
        }
        self.equipped.push(id);
        Ok(())
    }

    pub fn unequip(&mut self, id: ItemId) -> Result<(), EquipError> {
        if !self.is_equipped(id) {
            return Err(EquipError::NotEquipped);
        }
        self.equipped.retain(|e| *e != id);
        Ok(())
    }

    /// The wielded weapon
    pub fn weapon(&self) -> Option<&Item> {
        self.equipped()
            .find(|i| i.slot == Some(EquipmentSlot::Weapon))
    }

    /// Remove the wielded weapon from the inventory.
    pub fn take_weapon(&mut self) -> Option<Item> {
        let id = self.weapon()?.id;
        self.remove(id)
    }

    /// Weight of everything carried
    pub fn total_weight(&self) -> f64 {
        self.items.iter().map(|i| i.weight).sum()
    }

    pub fn attr_bonus(&self, kind: AttrType) -> i32 {
        self.equipped().map(|i| i.attrs[kind.index()]).sum()
    }

    pub fn modifier_bonus(&self, kind: ModifierType) -> i32 {
        self.equipped().map(|i| i.modifiers[kind.index()]).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::AttackType;

    #[test]
    fn test_equip_and_bonus() {
        let mut eq = Equipment::new();
        eq.add(Item::weapon(ItemId(1), "sword", AttackType::Cut, 4));
        eq.add(Item::armor(ItemId(2), "helm", EquipmentSlot::Helmet, 2));
        assert_eq!(eq.modifier_bonus(ModifierType::Damage), 0);
        eq.equip(ItemId(1)).unwrap();
        eq.equip(ItemId(2)).unwrap();
        assert_eq!(eq.modifier_bonus(ModifierType::Damage), 4);
        assert_eq!(eq.modifier_bonus(ModifierType::Defense), 2);
        assert_eq!(eq.weapon().map(|w| w.id), Some(ItemId(1)));
    }

    #[test]
    fn test_slot_capacity() {
        let mut eq = Equipment::new();
        eq.add(Item::weapon(ItemId(1), "sword", AttackType::Cut, 4));
        eq.add(Item::weapon(ItemId(2), "axe", AttackType::Cut, 5));
        eq.equip(ItemId(1)).unwrap();
        assert_eq!(eq.equip(ItemId(2)), Err(EquipError::SlotTaken));
        eq.unequip(ItemId(1)).unwrap();
        eq.equip(ItemId(2)).unwrap();
    }

    #[test]
    fn test_errors() {
        let mut eq = Equipment::new();
        eq.add(Item::new(ItemId(1), "rock"));
        assert_eq!(eq.equip(ItemId(1)), Err(EquipError::NotEquipable));
        assert_eq!(eq.equip(ItemId(9)), Err(EquipError::NotCarried));
        assert_eq!(eq.unequip(ItemId(1)), Err(EquipError::NotEquipped));
    }

    #[test]
    fn test_take_weapon_leaves_rest() {
        let mut eq = Equipment::new();
        eq.add(Item::weapon(ItemId(1), "sword", AttackType::Cut, 4));
        eq.add(Item::new(ItemId(2), "rock").with_weight(3.0));
        eq.equip(ItemId(1)).unwrap();
        let sword = eq.take_weapon().unwrap();
        assert_eq!(sword.name, "sword");
        assert!(eq.weapon().is_none());
        assert_eq!(eq.total_weight(), 3.0);
    }
}

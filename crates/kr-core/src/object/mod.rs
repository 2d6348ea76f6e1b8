//! Items and equipment
//!
//! Only what combat needs: weight, slot, attack type and the attribute and
//! modifier bonuses an equipped item grants.

mod equipment;
mod item;

pub use equipment::{EquipError, Equipment, EquipmentSlot};
pub use item::{Item, ItemClass, ItemId};

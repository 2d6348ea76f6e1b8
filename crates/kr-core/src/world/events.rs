//! Global events and statistics
//!
//! Events are pushed by the core as they happen and drained by whoever is
//! driving the simulation. Statistics are plain counters.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

use crate::creature::CreatureId;
use crate::object::ItemId;

/// Something that happened in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Attack {
        attacker: CreatureId,
        target: CreatureId,
    },
    Kill {
        victim: CreatureId,
        killer: Option<CreatureId>,
    },
    Pickup {
        who: CreatureId,
        items: Vec<ItemId>,
    },
    Drop {
        who: CreatureId,
        items: Vec<ItemId>,
    },
    Equip {
        who: CreatureId,
        item: ItemId,
    },
}

/// Counted statistics
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
#[repr(u8)]
pub enum StatId {
    Death = 0,
    InnocentKilled = 1,
    ChoppedLimb = 2,
    ChoppedHead = 3,
}

impl StatId {
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    counts: [u32; StatId::COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, stat: StatId) {
        self.counts[stat.index()] += 1;
    }

    pub fn get(&self, stat: StatId) -> u32 {
        self.counts[stat.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_count() {
        let mut stats = Statistics::new();
        stats.add(StatId::Death);
        stats.add(StatId::Death);
        stats.add(StatId::ChoppedHead);
        assert_eq!(stats.get(StatId::Death), 2);
        assert_eq!(stats.get(StatId::ChoppedHead), 1);
        assert_eq!(stats.get(StatId::InnocentKilled), 0);
    }
}

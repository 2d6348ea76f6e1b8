//! Tribes, standing and hostility
//!
//! Standing between two creatures starts from the tribe's view of the other
//! creature. A creature may carry extra enemy checks; each check reports a
//! standing together with a weight, and the heaviest answer wins.

use std::fmt;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Creature, CreatureId, LastingEffect};

/// Tribe identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TribeId(pub u32);

/// A standing value and how much it should count against other opinions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// Negative is hostile, positive is friendly
    pub value: f64,
    pub weight: f64,
}

impl Standing {
    pub const fn new(value: f64, weight: f64) -> Self {
        Self { value, weight }
    }
}

/// Extra opinion about another creature
pub trait EnemyCheck: fmt::Debug {
    /// `Some` when this check has an opinion about `other`
    fn standing(&self, me: &Creature, other: &Creature) -> Option<Standing>;
}

/// Fixed standing toward every member of one tribe
#[derive(Debug, Clone, Copy)]
pub struct TribeStanding {
    pub tribe: TribeId,
    pub standing: Standing,
}

impl EnemyCheck for TribeStanding {
    fn standing(&self, _me: &Creature, other: &Creature) -> Option<Standing> {
        (other.tribe() == self.tribe).then_some(self.standing)
    }
}

/// Fixed standing toward one creature
#[derive(Debug, Clone, Copy)]
pub struct CreatureStanding {
    pub target: CreatureId,
    pub standing: Standing,
}

impl EnemyCheck for CreatureStanding {
    fn standing(&self, _me: &Creature, other: &Creature) -> Option<Standing> {
        (other.id == self.target).then_some(self.standing)
    }
}

/// A group of creatures sharing allegiances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tribe {
    pub id: TribeId,
    pub name: String,
    members: HashSet<CreatureId>,
    /// Standing toward other tribes
    relations: HashMap<TribeId, f64>,
    /// Standing toward individual creatures, earned through their deeds
    personal: HashMap<CreatureId, f64>,
}

impl Tribe {
    pub fn new(id: TribeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: HashSet::new(),
            relations: HashMap::new(),
            personal: HashMap::new(),
        }
    }

    /// The tribe's standing toward a creature
    pub fn standing(&self, other: &Creature) -> f64 {
        if other.tribe() == self.id {
            return 1.0;
        }
        if let Some(v) = self.personal.get(&other.id) {
            return *v;
        }
        self.relations.get(&other.tribe()).copied().unwrap_or(0.0)
    }

    pub fn members(&self) -> impl Iterator<Item = CreatureId> + '_ {
        self.members.iter().copied()
    }

    pub fn is_member(&self, id: CreatureId) -> bool {
        self.members.contains(&id)
    }

    pub(crate) fn add_member(&mut self, id: CreatureId) {
        self.members.insert(id);
    }

    pub(crate) fn remove_member(&mut self, id: CreatureId) {
        self.members.remove(&id);
    }

    /// Shift the personal standing of a creature, clamped to `-1.0..=1.0`.
    pub fn add_personal(&mut self, id: CreatureId, delta: f64) {
        let v = self.personal.entry(id).or_insert(0.0);
        *v = (*v + delta).clamp(-1.0, 1.0);
    }
}

/// All tribes of a world
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TribeRegistry {
    tribes: HashMap<TribeId, Tribe>,
    next_id: u32,
}

impl TribeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>) -> TribeId {
        let id = TribeId(self.next_id);
        self.next_id += 1;
        self.tribes.insert(id, Tribe::new(id, name));
        id
    }

    pub fn get(&self, id: TribeId) -> Option<&Tribe> {
        self.tribes.get(&id)
    }

    pub fn get_mut(&mut self, id: TribeId) -> Option<&mut Tribe> {
        self.tribes.get_mut(&id)
    }

    /// Set the standing between two tribes, both directions.
    pub fn set_relation(&mut self, a: TribeId, b: TribeId, value: f64) {
        if let Some(t) = self.tribes.get_mut(&a) {
            t.relations.insert(b, value);
        }
        if let Some(t) = self.tribes.get_mut(&b) {
            t.relations.insert(a, value);
        }
    }

    pub fn make_enemies(&mut self, a: TribeId, b: TribeId) {
        self.set_relation(a, b, -1.0);
    }

    pub fn make_friends(&mut self, a: TribeId, b: TribeId) {
        self.set_relation(a, b, 1.0);
    }

    /// A member of `victim_tribe` was killed by `killer`.
    pub(crate) fn on_member_killed(
        &mut self,
        victim_tribe: TribeId,
        killer: CreatureId,
        penalty: f64,
    ) {
        if let Some(t) = self.tribes.get_mut(&victim_tribe) {
            if !t.is_member(killer) {
                t.add_personal(killer, -penalty);
                debug!(tribe = %t.name, killer = killer.0, "tribe standing lowered");
            }
        }
    }
}

impl Creature {
    pub fn tribe(&self) -> TribeId {
        self.tribe
    }

    /// Standing toward another creature
    pub fn standing(&self, other: &Creature, tribes: &TribeRegistry) -> Standing {
        let base = tribes
            .get(self.tribe)
            .map(|t| t.standing(other))
            .unwrap_or(0.0);
        let mut best = Standing::new(base, 0.0);
        if self.private_enemies.contains(&other.id) {
            best = Standing::new(-1.0, 1.0);
        }
        for check in &self.enemy_checks {
            if let Some(s) = check.standing(self, other) {
                if s.weight > best.weight {
                    best = s;
                }
            }
        }
        best
    }

    /// Whether `other` counts as an enemy. Never true for oneself.
    pub fn is_enemy(&self, other: &Creature, tribes: &TribeRegistry) -> bool {
        if other.id == self.id {
            return false;
        }
        if self.is_affected(LastingEffect::Insanity) {
            return true;
        }
        let mine = self.standing(other, tribes);
        let theirs = other.standing(self, tribes);
        let value = if mine.weight > theirs.weight {
            mine.value
        } else if theirs.weight > mine.weight {
            theirs.value
        } else {
            mine.value.min(theirs.value)
        };
        value < 0.0
    }

    pub fn is_friend(&self, other: &Creature, tribes: &TribeRegistry) -> bool {
        !self.is_enemy(other, tribes)
    }

    pub fn add_enemy_check(&mut self, check: Box<dyn EnemyCheck>) {
        self.enemy_checks.push(check);
    }

    pub fn private_enemies(&self) -> &[CreatureId] {
        &self.private_enemies
    }

    /// Remember an attacker from another tribe as a personal enemy.
    pub(crate) fn note_private_enemy(&mut self, attacker: CreatureId, attacker_tribe: TribeId) {
        if attacker_tribe != self.tribe && !self.private_enemies.contains(&attacker) {
            self.private_enemies.push(attacker);
        }
    }
}

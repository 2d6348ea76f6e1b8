//! Creatures
//!
//! A [`Creature`] is the aggregate root of the simulation: attributes,
//! lasting effects, body, relations and progression all hang off it. Other
//! creatures are referred to by [`CreatureId`] and looked up through the
//! world, which knows whether they are still alive.

mod attributes;
mod body;
mod effects;
mod health;
mod morale;
mod progression;
mod relations;
mod skills;

pub use attributes::{AttrType, ModifierType, simul_attack_penalty};
pub use body::{BodyPart, BodyParts, Injury, SeveredPart, part_count_name};
pub use effects::{LastingEffect, LastingEffects};
pub use morale::{EffectMorale, FixedMorale, MoraleOverride};
pub use relations::{
    CreatureStanding, EnemyCheck, Standing, Tribe, TribeId, TribeRegistry, TribeStanding,
};
pub use skills::{SkillId, Skillset};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::combat::{AttackType, EffectType};
use crate::consts::{FAST_DESCRIPTION, STRONG_DESCRIPTION};
use crate::geom::Vec2;
use crate::object::{Equipment, Item};

/// Creature identifier, unique within a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(pub u32);

impl std::fmt::Display for CreatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Creature trait flags
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CreatureFlags: u32 {
        /// Two arms, two legs, can use equipment
        const HUMANOID = 0x0001;
        const UNDEAD = 0x0002;
        /// Golems, elementals: no bleeding, no poison
        const NOT_LIVING = 0x0004;
        /// Spirits: no body, dissipate on any real hit
        const UNCORPOREAL = 0x0008;
        const CARRY_ANYTHING = 0x0010;
        /// Attack effect applies even when the hit does no damage
        const HARMLESS_APPLY = 0x0020;
        /// Killing this creature is recorded as an innocent death
        const INNOCENT = 0x0040;
        const NO_SLEEP = 0x0080;
        const BREATHING = 0x0100;
        const FIRE_CREATURE = 0x0200;
        /// Refuses to be swapped out of place
        const INVINCIBLE = 0x0400;
        const ANIMAL = 0x0800;
        /// Never moves or swaps
        const STATIONARY = 0x1000;
    }
}

/// Creature size
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum CreatureSize {
    Small = 0,
    Medium = 1,
    Large = 2,
    Huge = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    It,
}

/// Everything needed to build a creature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub name: String,
    /// Base strength, dexterity, speed
    pub attr: [i32; 3],
    pub size: CreatureSize,
    pub weight: f64,
    pub flags: CreatureFlags,
    pub body: BodyParts,
    pub barehanded_damage: i32,
    pub barehanded_attack: Option<AttackType>,
    /// Effect carried by this creature's hits
    pub attack_effect: Option<EffectType>,
    /// Effect applied to adjacent attackers
    pub passive_attack: Option<EffectType>,
    pub damage_multiplier: f64,
    pub gender: Gender,
    pub skills: Skillset,
    pub courage: f64,
    pub permanent_effects: Vec<LastingEffect>,
}

impl CreatureTemplate {
    pub fn humanoid(name: impl Into<String>, strength: i32, dexterity: i32, speed: i32) -> Self {
        Self {
            name: name.into(),
            attr: [strength, dexterity, speed],
            size: CreatureSize::Medium,
            weight: 90.0,
            flags: CreatureFlags::HUMANOID | CreatureFlags::BREATHING,
            body: BodyParts::humanoid(),
            barehanded_damage: 0,
            barehanded_attack: None,
            attack_effect: None,
            passive_attack: None,
            damage_multiplier: 1.0,
            gender: Gender::Male,
            skills: Skillset::new(),
            courage: 0.5,
            permanent_effects: Vec::new(),
        }
    }

    /// Four-legged animal with a bite
    pub fn beast(name: impl Into<String>, strength: i32, dexterity: i32, speed: i32) -> Self {
        Self {
            size: CreatureSize::Small,
            weight: 30.0,
            flags: CreatureFlags::ANIMAL | CreatureFlags::BREATHING,
            body: BodyParts::new(0, 4, 0, 1),
            barehanded_attack: Some(AttackType::Bite),
            gender: Gender::It,
            ..Self::humanoid(name, strength, dexterity, speed)
        }
    }

    pub fn with_size(mut self, size: CreatureSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_flags(mut self, flags: CreatureFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn without_flags(mut self, flags: CreatureFlags) -> Self {
        self.flags.remove(flags);
        self
    }

    pub fn with_body(mut self, body: BodyParts) -> Self {
        self.body = body;
        self
    }

    pub fn with_barehanded(mut self, attack: AttackType, damage: i32) -> Self {
        self.barehanded_attack = Some(attack);
        self.barehanded_damage = damage;
        self
    }

    pub fn with_attack_effect(mut self, effect: EffectType) -> Self {
        self.attack_effect = Some(effect);
        self
    }

    pub fn with_passive_attack(mut self, effect: EffectType) -> Self {
        self.passive_attack = Some(effect);
        self
    }

    pub fn with_damage_multiplier(mut self, mult: f64) -> Self {
        self.damage_multiplier = mult;
        self
    }

    pub fn with_skill(mut self, skill: SkillId, value: f64) -> Self {
        self.skills.insert(skill, value);
        self
    }

    pub fn with_permanent_effect(mut self, effect: LastingEffect) -> Self {
        self.permanent_effects.push(effect);
        self
    }

    /// Check required attributes.
    ///
    /// # Panics
    /// On a template that cannot describe a real creature. A bad template is
    /// a content bug, not a runtime condition.
    pub fn validate(&self) {
        assert!(!self.name.is_empty(), "creature template without a name");
        assert!(
            self.attr.iter().all(|v| *v >= 0),
            "{}: negative base attribute",
            self.name
        );
        assert!(self.attr[AttrType::Speed.index()] > 0, "{}: zero speed", self.name);
        assert!(self.body.is_consistent(), "{}: inconsistent body", self.name);
        if let Some(attack) = self.barehanded_attack {
            assert!(
                attack.is_barehanded(),
                "{}: {attack} is not a barehanded attack",
                self.name
            );
        }
    }
}

/// A simulated creature
#[derive(Debug, Serialize, Deserialize)]
pub struct Creature {
    pub id: CreatureId,
    pub name: String,
    tribe: TribeId,
    pub(crate) position: Vec2,
    /// Simulation time at which this creature next acts
    pub(crate) time: f64,
    /// Real time of the last tick
    pub(crate) last_tick: f64,
    pub(crate) attr: [i32; 3],
    pub(crate) attr_increase: [f64; 3],
    pub size: CreatureSize,
    pub weight: f64,
    pub flags: CreatureFlags,
    pub gender: Gender,
    pub skills: Skillset,
    pub barehanded_damage: i32,
    pub barehanded_attack: Option<AttackType>,
    pub attack_effect: Option<EffectType>,
    pub passive_attack: Option<EffectType>,
    pub damage_multiplier: f64,
    pub courage: f64,
    pub(crate) health: f64,
    pub(crate) morale: f64,
    #[serde(skip)]
    pub(crate) morale_overrides: Vec<Box<dyn MoraleOverride>>,
    #[serde(skip)]
    pub(crate) enemy_checks: Vec<Box<dyn EnemyCheck>>,
    pub(crate) dead: bool,
    pub(crate) collapsed: bool,
    pub(crate) body: BodyParts,
    pub(crate) effects: LastingEffects,
    pub(crate) last_attacker: Option<CreatureId>,
    pub(crate) unknown_attackers: Vec<CreatureId>,
    pub(crate) private_enemies: Vec<CreatureId>,
    pub(crate) kills: Vec<CreatureId>,
    pub(crate) points: i32,
    pub(crate) difficulty_points: i32,
    pub(crate) attacks_this_turn: u32,
    pub(crate) swap_cooldown: u32,
    pub(crate) visible_enemies: Vec<CreatureId>,
    pub equipment: Equipment,
}

impl Creature {
    /// Build a creature from a template. Permanent effects of the template
    /// are granted silently.
    pub fn new(id: CreatureId, tribe: TribeId, template: CreatureTemplate) -> Self {
        template.validate();
        let mut effects = LastingEffects::new();
        for effect in &template.permanent_effects {
            effects.add_permanent(*effect);
        }
        Self {
            id,
            name: template.name,
            tribe,
            position: Vec2::ZERO,
            time: 0.0,
            last_tick: 0.0,
            attr: template.attr,
            attr_increase: [0.0; 3],
            size: template.size,
            weight: template.weight,
            flags: template.flags,
            gender: template.gender,
            skills: template.skills,
            barehanded_damage: template.barehanded_damage,
            barehanded_attack: template.barehanded_attack,
            attack_effect: template.attack_effect,
            passive_attack: template.passive_attack,
            damage_multiplier: template.damage_multiplier,
            courage: template.courage,
            health: 1.0,
            morale: 0.0,
            morale_overrides: Vec::new(),
            enemy_checks: Vec::new(),
            dead: false,
            collapsed: false,
            body: template.body,
            effects,
            last_attacker: None,
            unknown_attackers: Vec::new(),
            private_enemies: Vec::new(),
            kills: Vec::new(),
            points: 0,
            difficulty_points: 0,
            attacks_this_turn: 0,
            swap_cooldown: 0,
            visible_enemies: Vec::new(),
            equipment: Equipment::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(template: CreatureTemplate) -> Self {
        Self::new(CreatureId(0), TribeId(0), template)
    }

    /// "the goblin"
    pub fn the_name(&self) -> String {
        format!("the {}", self.name)
    }

    /// "a goblin" / "an orc"
    pub fn a_name(&self) -> String {
        match self.name.chars().next() {
            Some(c) if "aeiouAEIOU".contains(c) => format!("an {}", self.name),
            _ => format!("a {}", self.name),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Simulation time of this creature's next action
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_humanoid(&self) -> bool {
        self.flags.contains(CreatureFlags::HUMANOID)
    }

    pub fn is_undead(&self) -> bool {
        self.flags.contains(CreatureFlags::UNDEAD)
    }

    pub fn is_living(&self) -> bool {
        !self.flags.contains(CreatureFlags::NOT_LIVING)
    }

    pub fn is_corporeal(&self) -> bool {
        !self.flags.contains(CreatureFlags::UNCORPOREAL)
    }

    /// Blinded, or every head gone
    pub fn is_blind(&self) -> bool {
        self.is_affected(LastingEffect::Blind)
            || (self.body.total(BodyPart::Head) > 0 && self.body.count(BodyPart::Head) == 0)
    }

    pub fn is_larger_than(&self, other: &Creature) -> bool {
        self.size > other.size
    }

    pub fn last_attacker(&self) -> Option<CreatureId> {
        self.last_attacker
    }

    /// Creatures this one has killed, oldest first
    pub fn kills(&self) -> &[CreatureId] {
        &self.kills
    }

    /// Attackers this creature could not see since it last acted
    pub fn unknown_attackers(&self) -> &[CreatureId] {
        &self.unknown_attackers
    }

    /// Enemies seen at the start of this creature's last turn
    pub fn visible_enemies(&self) -> &[CreatureId] {
        &self.visible_enemies
    }

    pub fn weapon(&self) -> Option<&Item> {
        self.equipment.weapon()
    }

    /// Attack used when hitting: the weapon's, then the barehanded one,
    /// then a punch or bite depending on the body plan.
    pub fn attack_type(&self) -> AttackType {
        if let Some(w) = self.weapon() {
            return w.attack_type;
        }
        match self.barehanded_attack {
            Some(a) => a,
            None if self.is_humanoid() => AttackType::Punch,
            None => AttackType::Bite,
        }
    }

    /// Adjectives describing the current condition
    pub fn adjectives(&self) -> Vec<String> {
        let mut ret = Vec::new();
        for part in [BodyPart::Arm, BodyPart::Leg, BodyPart::Wing, BodyPart::Head] {
            let injured = self.body.injured(part);
            if injured > 0 {
                ret.push(format!("{} injured", part_count_name(part, injured)));
            }
            let lost = self.body.lost(part);
            if lost > 0 {
                ret.push(format!("{} lost", part_count_name(part, lost)));
            }
        }
        if self.is_collapsed() {
            ret.push("collapsed".to_string());
        }
        for effect in self.effects.active(self.time) {
            if let Some(adj) = effect.adjective() {
                ret.push(adj.to_string());
            }
        }
        ret
    }

    /// One-line description such as "Strong and fast medium ogre with 2 arms,
    /// 2 legs."
    pub fn description(&self) -> String {
        let mut traits = Vec::new();
        if self.raw_attr(AttrType::Strength) > STRONG_DESCRIPTION {
            traits.push("strong");
        }
        if self.raw_attr(AttrType::Dexterity) > STRONG_DESCRIPTION {
            traits.push("agile");
        }
        if self.raw_attr(AttrType::Speed) > FAST_DESCRIPTION {
            traits.push("fast");
        }
        let mut parts = Vec::new();
        for part in [BodyPart::Arm, BodyPart::Leg, BodyPart::Wing, BodyPart::Head] {
            let n = self.body.count(part);
            if n > 0 && !(part == BodyPart::Head && n == 1) {
                parts.push(part_count_name(part, n));
            }
        }
        let mut text = String::new();
        if !traits.is_empty() {
            text.push_str(&traits.join(" and "));
            text.push(' ');
        }
        text.push_str(&self.size.to_string());
        text.push(' ');
        text.push_str(&self.name);
        if parts.is_empty() {
            text.push_str(" with no limbs");
        } else {
            text.push_str(" with ");
            text.push_str(&parts.join(", "));
        }
        if self.is_undead() {
            text.push_str(", undead");
        }
        let mut chars = text.chars();
        match chars.next() {
            Some(c) => format!("{}{}.", c.to_uppercase(), chars.as_str()),
            None => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::MessageLog;

    #[test]
    fn test_names() {
        let c = Creature::for_tests(CreatureTemplate::humanoid("orc", 14, 12, 100));
        assert_eq!(c.the_name(), "the orc");
        assert_eq!(c.a_name(), "an orc");
    }

    #[test]
    fn test_template_effects_granted_permanently() {
        let c = Creature::for_tests(
            CreatureTemplate::beast("bat", 4, 16, 150).with_permanent_effect(LastingEffect::Flying),
        );
        assert!(c.is_affected(LastingEffect::Flying));
        assert!(c.is_permanently_affected(LastingEffect::Flying));
    }

    #[test]
    #[should_panic]
    fn test_zero_speed_template_rejected() {
        let _ = Creature::for_tests(CreatureTemplate::humanoid("statue", 10, 10, 0));
    }

    #[test]
    #[should_panic]
    fn test_weapon_attack_cannot_be_barehanded() {
        let _ = Creature::for_tests(
            CreatureTemplate::humanoid("golem", 10, 10, 100).with_barehanded(AttackType::Cut, 2),
        );
    }

    #[test]
    fn test_default_attack_types() {
        let human = Creature::for_tests(CreatureTemplate::humanoid("human", 10, 10, 100));
        assert_eq!(human.attack_type(), AttackType::Punch);
        let wolf = Creature::for_tests(CreatureTemplate::beast("wolf", 12, 14, 130));
        assert_eq!(wolf.attack_type(), AttackType::Bite);
    }

    #[test]
    fn test_description() {
        let c = Creature::for_tests(CreatureTemplate::humanoid("ogre", 20, 10, 110));
        assert_eq!(c.description(), "Strong and fast medium ogre with 2 arms, 2 legs.");
    }

    #[test]
    fn test_adjectives_list_wounds_and_effects() {
        let mut c = Creature::for_tests(CreatureTemplate::humanoid("orc", 14, 12, 100));
        let mut log = MessageLog::new();
        c.injure_body_part(BodyPart::Arm, true, &mut log);
        c.add_effect(LastingEffect::Blind, 5.0, false, &mut log);
        let adj = c.adjectives();
        assert!(adj.contains(&"an arm lost".to_string()));
        assert!(adj.contains(&"blind".to_string()));
    }
}

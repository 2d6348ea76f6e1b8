//! Body parts, injuries and hit locations
//!
//! For each part kind a creature keeps its original count, how many are lost
//! and how many of the remaining ones are injured. `lost + injured <= total`
//! always holds.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};
use tracing::debug;

use super::{AttrType, Creature, CreatureSize, LastingEffect};
use crate::combat::AttackLevel;
use crate::consts::SEVERED_PART_WEIGHT_DIV;
use crate::object::Item;
use crate::rng::GameRng;
use crate::world::{MessageLog, MsgType, StatId};

/// Body part kinds
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumCount,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum BodyPart {
    Leg = 0,
    Arm = 1,
    Wing = 2,
    Head = 3,
    Torso = 4,
    Back = 5,
}

impl BodyPart {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_limb(self) -> bool {
        matches!(self, BodyPart::Leg | BodyPart::Arm | BodyPart::Wing)
    }

    /// Relative damage needed to injure this part
    pub const fn min_damage(self) -> f64 {
        match self {
            BodyPart::Wing => 0.3,
            BodyPart::Arm => 0.6,
            BodyPart::Leg => 0.8,
            BodyPart::Head => 0.8,
            BodyPart::Torso => 1.5,
            BodyPart::Back => 1.5,
        }
    }

    /// STRENGTH or DEXTERITY lost per injured or missing instance
    pub const fn attr_penalty(self, attr: AttrType) -> i32 {
        match attr {
            AttrType::Strength => match self {
                BodyPart::Arm => 2,
                BodyPart::Leg => 5,
                BodyPart::Wing => 2,
                BodyPart::Head => 3,
                BodyPart::Torso | BodyPart::Back => 0,
            },
            AttrType::Dexterity => match self {
                BodyPart::Arm => 2,
                BodyPart::Leg => 10,
                BodyPart::Wing => 3,
                BodyPart::Head => 3,
                BodyPart::Torso | BodyPart::Back => 0,
            },
            AttrType::Speed => 0,
        }
    }

    /// Stat recorded when the part is cut off, if any
    pub const fn severed_stat(self) -> Option<StatId> {
        match self {
            BodyPart::Head => Some(StatId::ChoppedHead),
            BodyPart::Leg | BodyPart::Arm | BodyPart::Wing => Some(StatId::ChoppedLimb),
            BodyPart::Torso | BodyPart::Back => None,
        }
    }
}

/// Per-part counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyParts {
    total: [i32; BodyPart::COUNT],
    injured: [i32; BodyPart::COUNT],
    lost: [i32; BodyPart::COUNT],
}

impl Default for BodyParts {
    fn default() -> Self {
        Self::new(0, 0, 0, 1)
    }
}

impl BodyParts {
    /// Body with the given limbs and heads; every body has one torso and one back.
    pub fn new(arms: i32, legs: i32, wings: i32, heads: i32) -> Self {
        let mut total = [0; BodyPart::COUNT];
        total[BodyPart::Arm.index()] = arms;
        total[BodyPart::Leg.index()] = legs;
        total[BodyPart::Wing.index()] = wings;
        total[BodyPart::Head.index()] = heads;
        total[BodyPart::Torso.index()] = 1;
        total[BodyPart::Back.index()] = 1;
        Self {
            total,
            injured: [0; BodyPart::COUNT],
            lost: [0; BodyPart::COUNT],
        }
    }

    pub fn humanoid() -> Self {
        Self::new(2, 2, 0, 1)
    }

    pub fn total(&self, part: BodyPart) -> i32 {
        self.total[part.index()]
    }

    /// Parts still attached
    pub fn count(&self, part: BodyPart) -> i32 {
        self.total[part.index()] - self.lost[part.index()]
    }

    pub fn injured(&self, part: BodyPart) -> i32 {
        self.injured[part.index()]
    }

    pub fn lost(&self, part: BodyPart) -> i32 {
        self.lost[part.index()]
    }

    /// Attached and uninjured
    pub fn healthy(&self, part: BodyPart) -> i32 {
        self.count(part) - self.injured[part.index()]
    }

    /// Injured and lost instances of one part
    pub fn damaged(&self, part: BodyPart) -> i32 {
        self.injured[part.index()] + self.lost[part.index()]
    }

    /// Injured and lost instances over the whole body
    pub fn total_damaged(&self) -> i32 {
        BodyPart::iter().map(|p| self.damaged(p)).sum()
    }

    pub fn is_consistent(&self) -> bool {
        BodyPart::iter().all(|p| {
            let i = p.index();
            self.injured[i] >= 0
                && self.lost[i] >= 0
                && self.lost[i] + self.injured[i] <= self.total[i]
        })
    }

    /// Injure one instance, or cut it off when `sever` is set.
    ///
    /// Returns false if the creature has none of that part.
    pub fn injure(&mut self, part: BodyPart, sever: bool) -> bool {
        let i = part.index();
        if self.count(part) == 0 {
            return false;
        }
        if sever {
            self.lost[i] += 1;
            // a severed part may have been one of the injured ones
            if self.injured[i] > self.count(part) {
                self.injured[i] -= 1;
            }
        } else if self.injured[i] < self.count(part) {
            self.injured[i] += 1;
        }
        debug_assert!(self.is_consistent());
        true
    }

    /// Mend every injury, returning the parts that were mended.
    pub fn mend_injuries(&mut self) -> Vec<(BodyPart, i32)> {
        let mut mended = Vec::new();
        for part in BodyPart::iter() {
            let n = std::mem::take(&mut self.injured[part.index()]);
            if n > 0 {
                mended.push((part, n));
            }
        }
        mended
    }

    /// Regrow every lost part, returning the parts that grew back.
    pub fn regrow(&mut self) -> Vec<(BodyPart, i32)> {
        let mut grown = Vec::new();
        for part in BodyPart::iter() {
            let n = std::mem::take(&mut self.lost[part.index()]);
            if n > 0 {
                grown.push((part, n));
            }
        }
        grown
    }

    /// Raise the count of a part to `count` if it has fewer attached.
    ///
    /// Returns how many were added.
    pub fn grow_to(&mut self, part: BodyPart, count: i32) -> i32 {
        let have = self.count(part);
        if count <= have {
            return 0;
        }
        let added = count - have;
        self.total[part.index()] += added;
        added
    }
}

/// Counted part name: "an arm", "2 legs"
pub fn part_count_name(part: BodyPart, n: i32) -> String {
    match (n, part) {
        (1, BodyPart::Arm) => format!("an {part}"),
        (1, _) => format!("a {part}"),
        _ => format!("{n} {part}s"),
    }
}

/// Item dropped into the world when a part is cut off
#[derive(Debug, Clone, PartialEq)]
pub struct SeveredPart {
    pub name: String,
    pub weight: f64,
}

/// Side effects of an injury that the world has to carry out
#[derive(Debug, Default)]
pub struct Injury {
    pub dropped_weapon: Option<Item>,
    pub severed: Option<SeveredPart>,
    pub stat: Option<StatId>,
}

impl Creature {
    pub fn body(&self) -> &BodyParts {
        &self.body
    }

    /// Attached, uninjured parts of a kind
    pub fn num_good(&self, part: BodyPart) -> i32 {
        self.body.healthy(part)
    }

    pub fn min_damage(&self, part: BodyPart) -> f64 {
        if self.is_undead() {
            part.min_damage() / 2.0
        } else {
            part.min_damage()
        }
    }

    /// Whether destroying this part kills outright
    pub fn is_critical(&self, part: BodyPart) -> bool {
        match part {
            BodyPart::Torso | BodyPart::Back => true,
            BodyPart::Head => self.num_good(BodyPart::Head) == 0 && !self.is_undead(),
            BodyPart::Leg | BodyPart::Arm | BodyPart::Wing => false,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Attack heights this creature can reach
    pub fn attack_levels(&self) -> Vec<AttackLevel> {
        if self.is_humanoid() && self.num_good(BodyPart::Arm) == 0 {
            return vec![AttackLevel::Low];
        }
        match self.size {
            CreatureSize::Small => vec![AttackLevel::Low],
            CreatureSize::Medium => vec![AttackLevel::Low, AttackLevel::Middle],
            CreatureSize::Large => vec![AttackLevel::Low, AttackLevel::Middle, AttackLevel::High],
            CreatureSize::Huge => vec![AttackLevel::Middle, AttackLevel::High],
        }
    }

    fn arm_or_wing(&self, rng: &mut GameRng) -> BodyPart {
        if self.num_good(BodyPart::Arm) == 0 {
            BodyPart::Wing
        } else if self.num_good(BodyPart::Wing) == 0 {
            BodyPart::Arm
        } else if rng.one_in(2) {
            BodyPart::Arm
        } else {
            BodyPart::Wing
        }
    }

    /// Choose which body part an attack at `level` lands on.
    pub fn body_part_for(&self, level: AttackLevel, rng: &mut GameRng) -> BodyPart {
        if self.is_affected(LastingEffect::Flying) {
            return weighted(
                rng,
                &[
                    (BodyPart::Torso, 1),
                    (BodyPart::Head, 1),
                    (BodyPart::Leg, 1),
                    (BodyPart::Wing, 2),
                    (BodyPart::Arm, 1),
                ],
            );
        }
        let small = self.size == CreatureSize::Small;
        let medium = self.size == CreatureSize::Medium;
        match level {
            AttackLevel::High => BodyPart::Head,
            AttackLevel::Middle => {
                if small || medium || self.collapsed {
                    BodyPart::Head
                } else {
                    let side = self.arm_or_wing(rng);
                    weighted(rng, &[(BodyPart::Torso, 1), (side, 1)])
                }
            }
            AttackLevel::Low => {
                if small || self.collapsed {
                    let side = self.arm_or_wing(rng);
                    weighted(
                        rng,
                        &[
                            (BodyPart::Torso, 1),
                            (side, 1),
                            (BodyPart::Head, 1),
                            (BodyPart::Leg, 1),
                        ],
                    )
                } else if medium {
                    let side = self.arm_or_wing(rng);
                    weighted(rng, &[(BodyPart::Torso, 1), (side, 1), (BodyPart::Leg, 3)])
                } else {
                    BodyPart::Leg
                }
            }
        }
    }

    /// Injure (or sever) one part and apply its immediate consequences to
    /// this creature: collapsing, dropping the weapon, losing flight.
    ///
    /// Anything that has to leave the creature is returned for the world to
    /// place.
    pub(crate) fn injure_body_part(
        &mut self,
        part: BodyPart,
        sever: bool,
        log: &mut MessageLog,
    ) -> Injury {
        let mut injury = Injury::default();
        if !self.body.injure(part, sever) {
            return injury;
        }
        debug!(creature = %self.name, %part, sever, "body part injured");
        if sever {
            injury.stat = part.severed_stat();
        }
        match part {
            BodyPart::Leg => {
                if !self.collapsed && !self.is_affected(LastingEffect::Flying) {
                    self.collapsed = true;
                    log.you(self, MsgType::Collapse, "");
                }
            }
            BodyPart::Arm => {
                if let Some(weapon) = self.equipment.take_weapon() {
                    log.you(self, MsgType::DropWeapon, &weapon.name);
                    injury.dropped_weapon = Some(weapon);
                }
            }
            BodyPart::Wing => {
                if self.is_permanently_affected(LastingEffect::Flying) {
                    self.remove_permanent_effect(LastingEffect::Flying, true, log);
                }
                let legs_ok = self.body.count(BodyPart::Leg) >= 2
                    && self.body.injured(BodyPart::Leg) == 0;
                if !legs_ok && !self.collapsed && !self.is_affected(LastingEffect::Flying) {
                    self.collapsed = true;
                    log.you(self, MsgType::Collapse, "");
                }
            }
            BodyPart::Head | BodyPart::Torso | BodyPart::Back => {}
        }
        if sever {
            let name = match part {
                BodyPart::Head => format!("{} skull", self.name),
                BodyPart::Torso | BodyPart::Back => format!("{} bone", self.name),
                BodyPart::Leg | BodyPart::Arm | BodyPart::Wing => {
                    format!("{} {}", self.name, part)
                }
            };
            injury.severed = Some(SeveredPart {
                name,
                weight: self.weight / SEVERED_PART_WEIGHT_DIV,
            });
        }
        injury
    }

    /// Stand up again once legs (or flight) allow it.
    pub(crate) fn update_collapse(&mut self, log: &mut MessageLog) {
        if !self.collapsed {
            return;
        }
        let legs_ok =
            self.body.count(BodyPart::Leg) >= 2 && self.body.injured(BodyPart::Leg) == 0;
        if legs_ok || self.is_affected(LastingEffect::Flying) {
            self.collapsed = false;
            log.you(self, MsgType::StandUp, "");
        }
    }
}

fn weighted(rng: &mut GameRng, options: &[(BodyPart, u32)]) -> BodyPart {
    let parts: Vec<BodyPart> = options.iter().map(|(p, _)| *p).collect();
    let weights: Vec<u32> = options.iter().map(|(_, w)| *w).collect();
    // weights above are never all zero
    rng.choose_weighted(&parts, &weights).unwrap_or(options[0].0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::CreatureTemplate;
    use crate::object::{Item, ItemId};

    #[test]
    fn test_injure_then_sever_keeps_invariant() {
        let mut body = BodyParts::humanoid();
        assert!(body.injure(BodyPart::Arm, false));
        assert!(body.injure(BodyPart::Arm, false));
        assert_eq!(body.healthy(BodyPart::Arm), 0);
        // third plain injury has nothing left to injure
        assert!(body.injure(BodyPart::Arm, false));
        assert_eq!(body.injured(BodyPart::Arm), 2);
        assert!(body.injure(BodyPart::Arm, true));
        assert_eq!(body.lost(BodyPart::Arm), 1);
        assert_eq!(body.injured(BodyPart::Arm), 1);
        assert!(body.is_consistent());
    }

    #[test]
    fn test_injure_missing_part_is_noop() {
        let mut body = BodyParts::humanoid();
        assert!(!body.injure(BodyPart::Wing, true));
        assert_eq!(body.lost(BodyPart::Wing), 0);
    }

    #[test]
    fn test_grow_to_never_downgrades() {
        let mut body = BodyParts::new(2, 2, 0, 1);
        assert_eq!(body.grow_to(BodyPart::Arm, 1), 0);
        assert_eq!(body.grow_to(BodyPart::Arm, 4), 2);
        assert_eq!(body.count(BodyPart::Arm), 4);
    }

    #[test]
    fn test_critical_parts() {
        let mut c = Creature::for_tests(CreatureTemplate::humanoid("orc", 14, 12, 100));
        assert!(c.is_critical(BodyPart::Torso));
        assert!(c.is_critical(BodyPart::Back));
        assert!(!c.is_critical(BodyPart::Head));
        c.body.injure(BodyPart::Head, false);
        assert!(c.is_critical(BodyPart::Head));
        c.flags.insert(crate::creature::CreatureFlags::UNDEAD);
        assert!(!c.is_critical(BodyPart::Head));
    }

    #[test]
    fn test_undead_min_damage_halved() {
        let mut c = Creature::for_tests(CreatureTemplate::humanoid("zombie", 14, 12, 100));
        assert_eq!(c.min_damage(BodyPart::Torso), 1.5);
        c.flags.insert(crate::creature::CreatureFlags::UNDEAD);
        assert_eq!(c.min_damage(BodyPart::Torso), 0.75);
    }

    #[test]
    fn test_attack_levels_by_size() {
        let mut c = Creature::for_tests(CreatureTemplate::beast("rat", 4, 10, 120));
        c.size = CreatureSize::Small;
        assert_eq!(c.attack_levels(), vec![AttackLevel::Low]);
        c.size = CreatureSize::Huge;
        assert_eq!(c.attack_levels(), vec![AttackLevel::Middle, AttackLevel::High]);
    }

    #[test]
    fn test_armless_humanoid_attacks_low() {
        let mut c = Creature::for_tests(CreatureTemplate::humanoid("orc", 14, 12, 100));
        c.body.injure(BodyPart::Arm, true);
        c.body.injure(BodyPart::Arm, true);
        assert_eq!(c.attack_levels(), vec![AttackLevel::Low]);
    }

    #[test]
    fn test_high_attack_hits_head() {
        let c = Creature::for_tests(CreatureTemplate::humanoid("troll", 20, 10, 100));
        let mut rng = GameRng::new(3);
        for _ in 0..50 {
            assert_eq!(c.body_part_for(AttackLevel::High, &mut rng), BodyPart::Head);
        }
    }

    #[test]
    fn test_low_attack_on_large_hits_leg() {
        let mut c = Creature::for_tests(CreatureTemplate::humanoid("ogre", 20, 10, 100));
        c.size = CreatureSize::Large;
        let mut rng = GameRng::new(3);
        for _ in 0..50 {
            assert_eq!(c.body_part_for(AttackLevel::Low, &mut rng), BodyPart::Leg);
        }
    }

    #[test]
    fn test_leg_injury_collapses() {
        let mut c = Creature::for_tests(CreatureTemplate::humanoid("goblin", 12, 12, 100));
        let mut log = MessageLog::new();
        c.injure_body_part(BodyPart::Leg, false, &mut log);
        assert!(c.is_collapsed());
        assert!(log.contains("collapse"));
    }

    #[test]
    fn test_severed_arm_drops_weapon() {
        let mut c = Creature::for_tests(CreatureTemplate::humanoid("knight", 16, 14, 100));
        let sword = Item::weapon(ItemId(1), "sword", crate::combat::AttackType::Cut, 4);
        c.equipment.add(sword);
        assert!(c.equipment.equip(ItemId(1)).is_ok());
        let mut log = MessageLog::new();
        let injury = c.injure_body_part(BodyPart::Arm, true, &mut log);
        assert_eq!(injury.dropped_weapon.map(|i| i.name), Some("sword".to_string()));
        assert_eq!(injury.stat, Some(StatId::ChoppedLimb));
        assert_eq!(injury.severed.map(|p| p.name), Some("knight arm".to_string()));
        assert!(c.weapon().is_none());
    }

    #[test]
    fn test_severed_torso_records_no_stat() {
        let mut c = Creature::for_tests(CreatureTemplate::humanoid("knight", 16, 14, 100));
        let mut log = MessageLog::new();
        let injury = c.injure_body_part(BodyPart::Torso, true, &mut log);
        assert_eq!(injury.stat, None);
        assert_eq!(c.body().lost(BodyPart::Torso), 1);
        let injury = c.injure_body_part(BodyPart::Head, true, &mut log);
        assert_eq!(injury.stat, Some(StatId::ChoppedHead));
    }

    #[test]
    fn test_wing_loss_removes_flight() {
        let template = CreatureTemplate::beast("bat", 6, 16, 150)
            .with_body(BodyParts::new(0, 2, 2, 1))
            .with_permanent_effect(LastingEffect::Flying);
        let mut c = Creature::for_tests(template);
        let mut log = MessageLog::new();
        assert!(c.is_affected(LastingEffect::Flying));
        c.injure_body_part(BodyPart::Wing, true, &mut log);
        assert!(!c.is_affected(LastingEffect::Flying));
    }
}

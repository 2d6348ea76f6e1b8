//! Experience, attribute growth and difficulty
//!
//! Experience level is derived from raw strength and dexterity, so growing
//! either one is how a creature levels up.

use strum::IntoEnumIterator;
use tracing::debug;

use super::{AttrType, Creature, ModifierType};
use crate::consts::EXP_LEVEL_BASELINE;
use crate::rng::GameRng;
use crate::world::Tuning;

/// Attributes that count towards experience level
const LEVEL_ATTRS: [AttrType; 2] = [AttrType::Strength, AttrType::Dexterity];

impl Creature {
    /// Fractional experience level, at least 1
    pub fn exp_level_f64(&self) -> f64 {
        let level: f64 = LEVEL_ATTRS
            .iter()
            .map(|a| 10.0 * (self.raw_attr(*a) / EXP_LEVEL_BASELINE - 1.0))
            .sum();
        level.max(1.0)
    }

    pub fn exp_level(&self) -> i32 {
        self.exp_level_f64() as i32
    }

    /// Accumulated kill points
    pub fn points(&self) -> i32 {
        self.points
    }

    pub fn attr_increase(&self, kind: AttrType) -> f64 {
        self.attr_increase[kind.index()]
    }

    /// Move an attribute's growth a step towards its cap.
    ///
    /// The cap is `(exercise_max - 1) * base`, approached asymptotically.
    pub fn exercise_attr(&mut self, kind: AttrType, value: f64, tuning: &Tuning) {
        let base = self.attr[kind.index()] as f64;
        let inc = &mut self.attr_increase[kind.index()];
        *inc += ((tuning.exercise_max - 1.0) * base - *inc) * tuning.exercise_rate * value;
    }

    /// Grow random attributes until the experience level has risen by
    /// `increase`. Gives up after a bounded number of steps.
    pub fn increase_exp_level(&mut self, increase: f64, rng: &mut GameRng, tuning: &Tuning) {
        let target = self.exp_level_f64() + increase;
        let attrs: Vec<AttrType> = AttrType::iter().collect();
        for _ in 0..tuning.exp_iteration_budget {
            if self.exp_level_f64() >= target {
                return;
            }
            if let Some(kind) = rng.choose(&attrs).copied() {
                self.exercise_attr(kind, tuning.level_gain_step, tuning);
            }
        }
        debug!(creature = %self.name, target, "experience target not reached");
    }

    /// Fold a kill into points and experience.
    pub(crate) fn on_kill(
        &mut self,
        victim_difficulty: i32,
        victim_level: f64,
        rng: &mut GameRng,
        tuning: &Tuning,
    ) {
        self.points += victim_difficulty;
        let diff = victim_level - self.exp_level_f64();
        let gain = ((tuning.max_level_gain - tuning.min_level_gain) * (diff + tuning.max_level_diff)
            / (2.0 * tuning.max_level_diff)
            + tuning.min_level_gain)
            .min(tuning.max_level_gain)
            .max(tuning.min_kill_gain);
        debug!(creature = %self.name, diff, gain, "kill experience");
        self.increase_exp_level(gain, rng, tuning);
    }

    /// Combat difficulty, a high-water mark that never decreases
    pub fn difficulty_points(&mut self) -> i32 {
        let current = self.modifier(ModifierType::Defense)
            + self.modifier(ModifierType::Accuracy)
            + self.modifier(ModifierType::Damage)
            + self.attr(AttrType::Speed) / 10;
        self.difficulty_points = self.difficulty_points.max(current);
        self.difficulty_points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::{BodyPart, CreatureTemplate};

    #[test]
    fn test_baseline_is_level_one() {
        let c = Creature::for_tests(CreatureTemplate::humanoid("peasant", 12, 12, 100));
        assert_eq!(c.exp_level(), 1);
    }

    #[test]
    fn test_level_from_raw_attributes() {
        let c = Creature::for_tests(CreatureTemplate::humanoid("veteran", 18, 18, 100));
        // 2 * 10 * (18 / 12 - 1) = 10
        assert_eq!(c.exp_level(), 10);
    }

    #[test]
    fn test_exercise_approaches_cap() {
        let tuning = Tuning::default();
        let mut c = Creature::for_tests(CreatureTemplate::humanoid("student", 10, 10, 100));
        let cap = (tuning.exercise_max - 1.0) * 10.0;
        let mut last = 0.0;
        for _ in 0..2000 {
            c.exercise_attr(AttrType::Strength, 1.0, &tuning);
            let now = c.attr_increase(AttrType::Strength);
            assert!(now >= last);
            assert!(now <= cap);
            last = now;
        }
        assert!(last > 0.0);
    }

    #[test]
    fn test_increase_exp_level_reaches_target() {
        let tuning = Tuning::default();
        let mut rng = GameRng::new(11);
        let mut c = Creature::for_tests(CreatureTemplate::humanoid("squire", 14, 14, 100));
        let before = c.exp_level_f64();
        c.increase_exp_level(1.0, &mut rng, &tuning);
        assert!(c.exp_level_f64() >= before + 1.0);
    }

    #[test]
    fn test_kill_adds_points() {
        let tuning = Tuning::default();
        let mut rng = GameRng::new(5);
        let mut c = Creature::for_tests(CreatureTemplate::humanoid("hunter", 12, 12, 100));
        c.on_kill(25, 1.0, &mut rng, &tuning);
        assert_eq!(c.points(), 25);
    }

    #[test]
    fn test_difficulty_is_high_water_mark() {
        let mut c = Creature::for_tests(CreatureTemplate::humanoid("guard", 12, 12, 100));
        let fresh = c.difficulty_points();
        // 12 defense + 12 accuracy + 12 damage + 10 speed
        assert_eq!(fresh, 46);
        c.body.injure(BodyPart::Leg, true);
        assert_eq!(c.difficulty_points(), fresh);
    }
}

//! Fixed rule constants
//!
//! Tunable knobs live in [`crate::world::Tuning`]; the values here are part of
//! the rules themselves and are not meant to be configured.

/// Flat bonus granted by STR_BONUS / DEX_BONUS, and added or taken by RAGE / PANIC.
pub const ATTR_BONUS: i32 = 3;

/// Penalty to strength and dexterity per extra attacker within a single turn.
pub const SIMUL_ATTACK_PENALTY: i32 = 2;

/// Flat DEFENSE granted by an active magic shield.
pub const MAGIC_SHIELD_DEFENSE: i32 = 20;

/// DEFENSE multiplier for a sleeping creature.
pub const SLEEP_DEFENSE_MULT: f64 = 0.66;

/// INV_LIMIT reported for creatures that can carry anything.
pub const UNLIMITED_INVENTORY: i32 = 1_000_000;

/// Raw STRENGTH / DEXTERITY of an experience-level-one creature.
pub const EXP_LEVEL_BASELINE: f64 = 12.0;

/// Time units per action at speed 100.
pub const TIME_UNIT: f64 = 100.0;

/// How far creatures look for enemies when starting their turn.
pub const SIGHT_RANGE: i32 = 15;

/// Health at or above which injured body parts mend.
pub const MEND_HEALTH: f64 = 0.5;

/// Health a healer will not top up beyond.
pub const FULL_HEALTH_EPSILON: f64 = 0.9999;

/// Strength above which a creature is described as strong or agile.
pub const STRONG_DESCRIPTION: f64 = 16.0;

/// Speed above which a creature is described as fast.
pub const FAST_DESCRIPTION: f64 = 100.0;

/// Minimum arms, legs and heads a consumer needs to become humanoid.
pub const HUMANOID_ARMS: i32 = 2;
pub const HUMANOID_LEGS: i32 = 2;
pub const HUMANOID_HEADS: i32 = 1;

/// Weight divisor for a severed body part item.
pub const SEVERED_PART_WEIGHT_DIV: f64 = 8.0;

/// Health lost when a flying creature drops to the ground.
pub const FLYING_FALL_DAMAGE: f64 = 0.1;

//! Simulation tuning
//!
//! Numeric knobs of the simulation that a scenario may want to change. Every
//! field has a default, so a config file only needs the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a tuning file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// World-level tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Turns of shield duration one absorbed hit costs
    pub magic_shield_absorb: f64,
    /// Damage added to a blow from an unseen attacker
    pub backstab_bonus: i32,

    // Progression
    /// Attribute growth cap as a multiple of the base value
    pub exercise_max: f64,
    pub exercise_rate: f64,
    /// Exercise weight of one step of `increase_exp_level`
    pub level_gain_step: f64,
    pub exp_iteration_budget: u32,
    pub max_level_gain: f64,
    pub min_level_gain: f64,
    /// Level gap at which a kill gives the full gain
    pub max_level_diff: f64,
    pub min_kill_gain: f64,

    // Health
    /// Health left after a non-fatal injury that would have reached zero
    pub health_floor: f64,
    /// Below this health a creature keeps bleeding
    pub bleed_threshold: f64,
    /// Health lost per unit of real time while bleeding
    pub bleed_rate: f64,
    /// Health lost per tick while poisoned
    pub poison_bleed: f64,

    // Lifecycle
    /// Chance for each trait of a consumed creature to carry over
    pub consume_trait_chance: f64,
    /// One in this many EAT blows swallow a smaller target whole
    pub devour_chance: u32,
    pub insanity_duration: f64,
    /// Damaged parts at which a non-living creature falls apart
    pub fall_apart_parts: i32,
    /// Turns a creature refuses a second swap
    pub swap_cooldown: u32,
    /// Standing a tribe loses toward a killer of one of its members
    pub member_kill_standing: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            magic_shield_absorb: 5.0,
            backstab_bonus: 10,
            exercise_max: 2.0,
            exercise_rate: 0.001,
            level_gain_step: 0.05,
            exp_iteration_budget: 100_000,
            max_level_gain: 2.0,
            min_level_gain: 0.1,
            max_level_diff: 7.0,
            min_kill_gain: 0.05,
            health_floor: 0.01,
            bleed_threshold: 0.5,
            bleed_rate: 1.0 / 40.0,
            poison_bleed: 1.0 / 60.0,
            consume_trait_chance: 0.5,
            devour_chance: 3,
            insanity_duration: 10.0,
            fall_apart_parts: 4,
            swap_cooldown: 4,
            member_kill_standing: 0.5,
        }
    }
}

impl Tuning {
    /// Parse a JSON tuning document
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Load tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> String {
        // a struct of plain numbers always serializes
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "backstab_bonus": 4, "devour_chance": 2 }"#).unwrap();
        assert_eq!(tuning.backstab_bonus, 4);
        assert_eq!(tuning.devour_chance, 2);
        assert_eq!(tuning.health_floor, 0.01);
        assert_eq!(tuning.exp_iteration_budget, 100_000);
    }

    #[test]
    fn test_bad_document() {
        let err = Tuning::from_json_str("{ backstab_bonus: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Tuning::load(Path::new("/nonexistent/tuning.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_roundtrip_through_json() {
        let tuning = Tuning {
            swap_cooldown: 9,
            ..Tuning::default()
        };
        let back = Tuning::from_json_str(&tuning.to_json_string()).unwrap();
        assert_eq!(back.swap_cooldown, 9);
        assert_eq!(back.exp_iteration_budget, tuning.exp_iteration_budget);
        assert_eq!(back.bleed_rate, tuning.bleed_rate);
    }
}

//! Engine configuration.
//!
//! Every field has a default equal to the shipped balance, so a JSON config
//! only needs the keys it overrides:
//!
//! ```
//! use guild_core::config::GuildConfig;
//!
//! let cfg = GuildConfig::from_json_str(r#"{ "seed": 7, "starting_gold": 1000 }"#).unwrap();
//! assert_eq!(cfg.seed, Some(7));
//! assert_eq!(cfg.starting_gold, 1000);
//! assert_eq!(cfg.referral_payout, 25);
//! ```

use guild_logic::constants::{economy, generation, DEFAULT_TIME_SCALE};
use guild_logic::resolution::ResolutionConfig;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuildConfig {
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub starting_gold: i64,
    pub starting_standing: i64,
    /// Virtual seconds per real second.
    pub time_scale: f64,
    /// Gold paid when an offered order is referred elsewhere.
    pub referral_payout: i64,
    /// Paid promotion costs `level_up_base_cost * level`.
    pub level_up_base_cost: i64,
    pub resolution: ResolutionConfig,
    pub generation: GenerationConfig,
}

impl Default for GuildConfig {
    fn default() -> Self {
        Self {
            seed: None,
            starting_gold: economy::STARTING_GOLD,
            starting_standing: economy::STARTING_STANDING,
            time_scale: DEFAULT_TIME_SCALE,
            referral_payout: economy::REFERRAL_PAYOUT,
            level_up_base_cost: economy::LEVEL_UP_BASE_COST,
            resolution: ResolutionConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl GuildConfig {
    /// Parse and validate.
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the resolution and generation math cannot work with.
    pub fn validate(&self) -> Result<(), DataError> {
        let r = &self.resolution;
        for (field, value) in [
            ("resolution.base_chance", r.base_chance),
            ("resolution.per_strength_point", r.per_strength_point),
            ("resolution.min_chance", r.min_chance),
            ("resolution.max_chance", r.max_chance),
        ] {
            if !value.is_finite() {
                return Err(invalid(field, format!("{value} is not finite")));
            }
        }
        if r.min_chance > r.max_chance {
            return Err(invalid(
                "resolution.min_chance",
                format!("{} exceeds max_chance {}", r.min_chance, r.max_chance),
            ));
        }
        for (field, value) in [
            ("resolution.noise", r.noise),
            ("resolution.base_injury_chance", r.base_injury_chance),
            ("resolution.base_death_chance", r.base_death_chance),
            ("resolution.failure_injury_multiplier", r.failure_injury_multiplier),
            ("resolution.failure_death_multiplier", r.failure_death_multiplier),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("{value} must be finite and non-negative")));
            }
        }

        let g = &self.generation;
        if g.min_difficulty > g.max_difficulty {
            return Err(invalid(
                "generation.min_difficulty",
                format!("{} exceeds max_difficulty {}", g.min_difficulty, g.max_difficulty),
            ));
        }
        if !g.min_duration_secs.is_finite() {
            return Err(invalid("generation.min_duration_secs", "not finite".to_string()));
        }
        Ok(())
    }

    /// Same config with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

fn invalid(field: &'static str, reason: String) -> DataError {
    DataError::InvalidConfig { field, reason }
}

/// Order generation bounds and the fallback order template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub min_difficulty: i32,
    pub max_difficulty: i32,
    /// Floor for both staffing and mission durations, virtual seconds.
    pub min_duration_secs: f64,
    /// Fallback difficulty is drawn from `[min, max)`.
    pub fallback_difficulty_min: i32,
    pub fallback_difficulty_max: i32,
    pub fallback_gold_per_difficulty: i64,
    pub fallback_xp_per_difficulty: u32,
    pub fallback_staffing_secs: f64,
    pub fallback_mission_secs: f64,
    pub fallback_min_party: usize,
    pub fallback_max_party: usize,
    /// Title used when no monster data is available.
    pub generic_title: String,
    pub generic_description: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_difficulty: generation::MIN_DIFFICULTY,
            max_difficulty: generation::MAX_DIFFICULTY,
            min_duration_secs: generation::MIN_DURATION_SECS,
            fallback_difficulty_min: generation::FALLBACK_DIFFICULTY_MIN,
            fallback_difficulty_max: generation::FALLBACK_DIFFICULTY_MAX,
            fallback_gold_per_difficulty: generation::FALLBACK_GOLD_PER_DIFFICULTY,
            fallback_xp_per_difficulty: generation::FALLBACK_XP_PER_DIFFICULTY,
            fallback_staffing_secs: generation::FALLBACK_STAFFING_SECS,
            fallback_mission_secs: generation::FALLBACK_MISSION_SECS,
            fallback_min_party: generation::DEFAULT_MIN_PARTY,
            fallback_max_party: generation::DEFAULT_MAX_PARTY,
            generic_title: "Monster Hunt".to_string(),
            generic_description: "A dangerous creature needs to be dealt with.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_balance() {
        let cfg = GuildConfig::default();
        assert_eq!(cfg.starting_gold, 500);
        assert_eq!(cfg.starting_standing, 0);
        assert_eq!(cfg.time_scale, 60.0);
        assert_eq!(cfg.level_up_base_cost, 100);
        assert_eq!(cfg.generation.fallback_staffing_secs, 180.0);
        assert_eq!(cfg.resolution.max_chance, 95.0);
    }

    #[test]
    fn test_nested_partial_override() {
        let cfg =
            GuildConfig::from_json_str(r#"{ "resolution": { "noise": 0.0 } }"#).unwrap();
        assert_eq!(cfg.resolution.noise, 0.0);
        assert_eq!(cfg.resolution.base_chance, 50.0);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn test_defaults_validate() {
        assert!(GuildConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_chance_band_rejected() {
        let err = GuildConfig::from_json_str(
            r#"{ "resolution": { "min_chance": 95.0, "max_chance": 5.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidConfig { field: "resolution.min_chance", .. }
        ));
    }

    #[test]
    fn test_non_finite_and_negative_values_rejected() {
        let mut cfg = GuildConfig::default();
        cfg.resolution.max_chance = f32::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = GuildConfig::default();
        cfg.resolution.noise = f32::INFINITY;
        assert!(cfg.validate().is_err());

        let err = GuildConfig::from_json_str(r#"{ "resolution": { "noise": -1.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidConfig { field: "resolution.noise", .. }));

        let err = GuildConfig::from_json_str(
            r#"{ "resolution": { "failure_death_multiplier": -3.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::InvalidConfig { .. }));
    }

    #[test]
    fn test_inverted_difficulty_bounds_rejected() {
        let err = GuildConfig::from_json_str(
            r#"{ "generation": { "min_difficulty": 50, "max_difficulty": 10 } }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidConfig { field: "generation.min_difficulty", .. }
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = GuildConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, DataError::Json(_)));
    }
}

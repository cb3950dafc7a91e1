//! Mission resolution math.
//!
//! Success chance compares aggregate party strength against order
//! difficulty, adds trait bonuses and a little noise, and clamps to
//! `[min_chance, max_chance]`. A single draw in `[0, 100)` decides the
//! outcome. Casualties are rolled per member afterwards: death first, and
//! only the living get an injury roll.
//!
//! ```
//! use guild_logic::resolution::{base_success_chance, ResolutionConfig};
//!
//! let cfg = ResolutionConfig::default();
//! // 50 + 2 * (25 - 20)
//! assert_eq!(base_success_chance(25, 20, 0.0, &cfg), 60.0);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{chance, risk};
use crate::stats::TraitTotals;

/// Tunables for success chance and casualty risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Chance with strength equal to difficulty, percent.
    pub base_chance: f32,
    /// Percent points per strength point of difference.
    pub per_strength_point: f32,
    /// Half-width of the uniform noise, percent points.
    pub noise: f32,
    pub min_chance: f32,
    pub max_chance: f32,
    pub base_injury_chance: f32,
    pub base_death_chance: f32,
    pub failure_injury_multiplier: f32,
    pub failure_death_multiplier: f32,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            base_chance: chance::BASE,
            per_strength_point: chance::PER_STRENGTH_POINT,
            noise: chance::NOISE,
            min_chance: chance::MIN,
            max_chance: chance::MAX,
            base_injury_chance: risk::BASE_INJURY,
            base_death_chance: risk::BASE_DEATH,
            failure_injury_multiplier: risk::FAILURE_INJURY_MULTIPLIER,
            failure_death_multiplier: risk::FAILURE_DEATH_MULTIPLIER,
        }
    }
}

/// Success chance before noise and clamping.
pub fn base_success_chance(
    party_strength: i32,
    difficulty: i32,
    trait_bonus: f32,
    config: &ResolutionConfig,
) -> f32 {
    config.base_chance
        + config.per_strength_point * (party_strength - difficulty) as f32
        + trait_bonus
}

/// Clamp a chance into the configured band.
pub fn clamp_chance(chance: f32, config: &ResolutionConfig) -> f32 {
    chance.clamp(config.min_chance, config.max_chance)
}

/// Deterministic chance shown to the operator while drafting a party.
pub fn preview_success_chance(
    party_strength: i32,
    difficulty: i32,
    trait_bonus: f32,
    config: &ResolutionConfig,
) -> f32 {
    clamp_chance(
        base_success_chance(party_strength, difficulty, trait_bonus, config),
        config,
    )
}

/// Chance used for an actual resolution: base plus uniform noise, clamped.
pub fn roll_success_chance(
    party_strength: i32,
    difficulty: i32,
    trait_bonus: f32,
    config: &ResolutionConfig,
    rng: &mut impl Rng,
) -> f32 {
    let noise = if config.noise > 0.0 {
        rng.gen_range(-config.noise..config.noise)
    } else {
        0.0
    };
    clamp_chance(
        base_success_chance(party_strength, difficulty, trait_bonus, config) + noise,
        config,
    )
}

/// Draw in `[0, 100)`; success iff the draw lands under `chance`.
pub fn roll_outcome(chance: f32, rng: &mut impl Rng) -> bool {
    rng.gen_range(0.0f32..100.0) < chance
}

/// Gold and standing granted by a resolved mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    pub gold: i64,
    pub standing: i64,
}

/// Full gold and `max(1, difficulty / 10)` standing on success;
/// half gold (floored) and no standing on failure.
pub fn mission_rewards(success: bool, gold_reward: i64, difficulty: i32) -> Rewards {
    if success {
        Rewards {
            gold: gold_reward,
            standing: i64::from((difficulty / 10).max(1)),
        }
    } else {
        Rewards {
            gold: gold_reward / 2,
            standing: 0,
        }
    }
}

/// Experience for each surviving member.
pub fn experience_reward(success: bool, xp_reward: u32) -> u32 {
    if success {
        xp_reward
    } else {
        xp_reward / 2
    }
}

/// Per-member casualty probabilities, each 0.0–1.0 (not clamped above).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberRisk {
    pub injury: f32,
    pub death: f32,
}

/// Base risks, scaled up on failure, then by the member's trait multipliers.
pub fn member_risk(success: bool, traits: &TraitTotals, config: &ResolutionConfig) -> MemberRisk {
    let mut injury = config.base_injury_chance;
    let mut death = config.base_death_chance;
    if !success {
        injury *= config.failure_injury_multiplier;
        death *= config.failure_death_multiplier;
    }
    MemberRisk {
        injury: injury * traits.injury_multiplier,
        death: death * traits.death_multiplier,
    }
}

/// What happened to one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Casualty {
    Unharmed,
    Injured,
    Died,
}

impl Casualty {
    pub fn survived(self) -> bool {
        !matches!(self, Casualty::Died)
    }
}

/// Roll death, then (for the living only) injury. Two independent draws.
pub fn roll_casualty(risk: &MemberRisk, rng: &mut impl Rng) -> Casualty {
    if rng.gen::<f32>() < risk.death {
        return Casualty::Died;
    }
    if rng.gen::<f32>() < risk.injury {
        Casualty::Injured
    } else {
        Casualty::Unharmed
    }
}

/// Qualitative risk band for a success chance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskTier {
    pub fn from_chance(chance: f32) -> Self {
        if chance >= 80.0 {
            Self::Low
        } else if chance >= 60.0 {
            Self::Moderate
        } else if chance >= 40.0 {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
            Self::VeryHigh => "Very High Risk",
        }
    }
}

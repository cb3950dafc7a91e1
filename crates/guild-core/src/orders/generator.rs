//! Order generation.
//!
//! A difficulty tier is drawn by weight from the tiers whose standing band
//! contains the current standing, then a monster by weight. Tier values get
//! symmetric integer variance and are clamped to sane bounds. With no
//! eligible tier the fallback template is used; with no monsters the order
//! gets a generic title.

use guild_logic::weighting::{pick_weighted, vary_int, vary_secs};
use rand::Rng;

use super::order::OrderSpec;
use crate::config::GenerationConfig;
use crate::data::{DifficultyTier, GameData, MonsterDef};

/// Generate order parameters for the given standing.
pub fn generate_spec(
    data: &GameData,
    standing: i64,
    config: &GenerationConfig,
    rng: &mut impl Rng,
) -> OrderSpec {
    let eligible = data.eligible_tiers(standing);
    let tier = pick_weighted(&eligible, |t| t.weight, rng).copied();
    let monster = pick_weighted(&data.monsters, |m| m.weight, rng);

    let mut spec = match tier {
        Some(tier) => from_tier(tier, config, rng),
        None => {
            log::warn!("no difficulty tier admits standing {standing}, using fallback order");
            fallback_spec(config, rng)
        }
    };
    if let Some(monster) = monster {
        name_after(&mut spec, monster);
    }
    spec
}

/// The generic order used when no tier applies.
pub fn fallback_spec(config: &GenerationConfig, rng: &mut impl Rng) -> OrderSpec {
    let lo = config.fallback_difficulty_min;
    let hi = config.fallback_difficulty_max;
    let rolled = if hi > lo { rng.gen_range(lo..hi) } else { lo };
    let difficulty = clamp_difficulty(rolled, config);

    let min_party = config.fallback_min_party.max(1);
    OrderSpec {
        title: config.generic_title.clone(),
        description: config.generic_description.clone(),
        monster: None,
        difficulty,
        gold_reward: (i64::from(difficulty) * config.fallback_gold_per_difficulty).max(1),
        xp_reward: (difficulty.max(0) as u32)
            .saturating_mul(config.fallback_xp_per_difficulty)
            .max(1),
        staffing_secs: config.fallback_staffing_secs.max(config.min_duration_secs),
        mission_secs: config.fallback_mission_secs.max(config.min_duration_secs),
        min_party,
        max_party: config.fallback_max_party.max(min_party),
    }
}

fn from_tier(tier: &DifficultyTier, config: &GenerationConfig, rng: &mut impl Rng) -> OrderSpec {
    let difficulty = vary_int(
        i64::from(tier.difficulty),
        i64::from(tier.difficulty_variance),
        rng,
    );
    let gold = vary_int(tier.gold_reward, tier.gold_variance, rng);
    let xp = vary_int(i64::from(tier.xp_reward), i64::from(tier.xp_variance), rng);
    let staffing = vary_secs(tier.staffing_secs, tier.staffing_variance, rng);
    let mission = vary_secs(tier.mission_secs, tier.mission_variance, rng);

    OrderSpec {
        title: config.generic_title.clone(),
        description: config.generic_description.clone(),
        monster: None,
        difficulty: clamp_difficulty(narrow(difficulty), config),
        gold_reward: gold.max(1),
        xp_reward: xp.clamp(1, i64::from(u32::MAX)) as u32,
        staffing_secs: staffing.max(config.min_duration_secs),
        mission_secs: mission.max(config.min_duration_secs),
        min_party: tier.min_party,
        max_party: tier.max_party,
    }
}

fn name_after(spec: &mut OrderSpec, monster: &MonsterDef) {
    spec.title = monster.name.clone();
    spec.description = monster
        .description
        .clone()
        .unwrap_or_else(|| format!("A {} is causing trouble.", monster.name));
    spec.monster = Some(monster.id.clone());
}

fn narrow(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn clamp_difficulty(value: i32, config: &GenerationConfig) -> i32 {
    value.max(config.min_difficulty).min(config.max_difficulty)
}

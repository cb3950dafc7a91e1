//! Hunter stats: base values, per-level growth, and trait modifiers.
//!
//! Combat strength is always derived: base stats grow linearly with level,
//! then each trait applies its percentage modifier in declaration order.
//! Nothing here is cached, so strength can never drift from level.
//!
//! ```
//! use guild_logic::stats::{combat_strength, BaseStats, StatGrowth, TraitModifiers};
//!
//! let base = BaseStats { power: 10, defense: 10, resolve: 10 };
//! // level 3 adds +2 per level to each stat: 14 + 14 + 14
//! assert_eq!(combat_strength(&base, &StatGrowth::default(), 3, &[]), 42);
//!
//! let brave = TraitModifiers { power: 0.5, ..TraitModifiers::default() };
//! assert_eq!(combat_strength(&base, &StatGrowth::default(), 1, &[brave]), 35);
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::hunters::STAT_GROWTH_PER_LEVEL;

/// The three combat stats of a hunter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub power: i32,
    pub defense: i32,
    pub resolve: i32,
}

impl BaseStats {
    /// Sum of all three stats.
    pub fn total(&self) -> i32 {
        self.power + self.defense + self.resolve
    }
}

/// Flat stat gain per level above 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatGrowth {
    pub power: i32,
    pub defense: i32,
    pub resolve: i32,
}

impl Default for StatGrowth {
    fn default() -> Self {
        Self {
            power: STAT_GROWTH_PER_LEVEL,
            defense: STAT_GROWTH_PER_LEVEL,
            resolve: STAT_GROWTH_PER_LEVEL,
        }
    }
}

/// Numeric part of a trait.
///
/// Stat modifiers are fractions (`0.1` = +10%). `success_chance_bonus` is in
/// percent points. Risk modifiers multiply (`1.0` = unchanged).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraitModifiers {
    pub power: f32,
    pub defense: f32,
    pub resolve: f32,
    pub success_chance_bonus: f32,
    pub injury_risk: f32,
    pub death_risk: f32,
}

impl Default for TraitModifiers {
    fn default() -> Self {
        Self {
            power: 0.0,
            defense: 0.0,
            resolve: 0.0,
            success_chance_bonus: 0.0,
            injury_risk: 1.0,
            death_risk: 1.0,
        }
    }
}

/// Mission-facing totals of a hunter's traits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitTotals {
    /// Sum of success bonuses, percent points.
    pub success_bonus: f32,
    /// Product of injury risk modifiers.
    pub injury_multiplier: f32,
    /// Product of death risk modifiers.
    pub death_multiplier: f32,
}

impl Default for TraitTotals {
    fn default() -> Self {
        Self {
            success_bonus: 0.0,
            injury_multiplier: 1.0,
            death_multiplier: 1.0,
        }
    }
}

/// Stats at a given level before trait modifiers. Levels below 1 count as 1.
pub fn stats_at_level(base: &BaseStats, growth: &StatGrowth, level: u32) -> BaseStats {
    let bonus_levels = level.max(1) as i32 - 1;
    BaseStats {
        power: base.power + bonus_levels * growth.power,
        defense: base.defense + bonus_levels * growth.defense,
        resolve: base.resolve + bonus_levels * growth.resolve,
    }
}

/// Apply trait percentage modifiers, one trait at a time.
pub fn apply_traits(stats: BaseStats, traits: &[TraitModifiers]) -> BaseStats {
    traits.iter().fold(stats, |s, t| BaseStats {
        power: s.power + scaled(s.power, t.power),
        defense: s.defense + scaled(s.defense, t.defense),
        resolve: s.resolve + scaled(s.resolve, t.resolve),
    })
}

/// Halfway cases round to the even neighbour.
fn scaled(value: i32, fraction: f32) -> i32 {
    (value as f32 * fraction).round_ties_even() as i32
}

/// Final stats at `level` with every trait applied.
pub fn effective_stats(
    base: &BaseStats,
    growth: &StatGrowth,
    level: u32,
    traits: &[TraitModifiers],
) -> BaseStats {
    apply_traits(stats_at_level(base, growth, level), traits)
}

/// Combat strength used by mission resolution: power + defense + resolve.
pub fn combat_strength(
    base: &BaseStats,
    growth: &StatGrowth,
    level: u32,
    traits: &[TraitModifiers],
) -> i32 {
    effective_stats(base, growth, level, traits).total()
}

/// Fold a hunter's traits into mission-facing totals.
pub fn aggregate_traits(traits: &[TraitModifiers]) -> TraitTotals {
    traits.iter().fold(TraitTotals::default(), |acc, t| TraitTotals {
        success_bonus: acc.success_bonus + t.success_chance_bonus,
        injury_multiplier: acc.injury_multiplier * t.injury_risk,
        death_multiplier: acc.death_multiplier * t.death_risk,
    })
}

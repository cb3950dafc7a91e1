//! Default balance values.
//!
//! These are the shipped defaults for every tunable the engine exposes
//! through its configuration. Nothing in this crate reads them implicitly
//! except the `Default` impls of the config structs.

/// Virtual seconds in one in-game day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Real-to-virtual time multiplier (1 real second = 1 virtual minute).
pub const DEFAULT_TIME_SCALE: f64 = 60.0;

pub mod chance {
    /// Success chance with an evenly matched party, in percent.
    pub const BASE: f32 = 50.0;
    /// Percent points per point of strength over (or under) difficulty.
    pub const PER_STRENGTH_POINT: f32 = 2.0;
    /// Half-width of the uniform noise added to each resolution.
    pub const NOISE: f32 = 5.0;
    pub const MIN: f32 = 5.0;
    pub const MAX: f32 = 95.0;
}

pub mod risk {
    pub const BASE_INJURY: f32 = 0.2;
    pub const BASE_DEATH: f32 = 0.05;
    pub const FAILURE_INJURY_MULTIPLIER: f32 = 2.0;
    pub const FAILURE_DEATH_MULTIPLIER: f32 = 3.0;
}

pub mod economy {
    pub const STARTING_GOLD: i64 = 500;
    pub const STARTING_STANDING: i64 = 0;
    /// Gold paid for referring an offered order elsewhere.
    pub const REFERRAL_PAYOUT: i64 = 25;
    /// Manual promotion costs this much gold per current level.
    pub const LEVEL_UP_BASE_COST: i64 = 100;
}

pub mod generation {
    /// Difficulty range used when no tier is eligible (end exclusive).
    pub const FALLBACK_DIFFICULTY_MIN: i32 = 5;
    pub const FALLBACK_DIFFICULTY_MAX: i32 = 15;
    pub const FALLBACK_GOLD_PER_DIFFICULTY: i64 = 10;
    pub const FALLBACK_XP_PER_DIFFICULTY: u32 = 5;
    pub const FALLBACK_STAFFING_SECS: f64 = 180.0;
    pub const FALLBACK_MISSION_SECS: f64 = 300.0;
    pub const DEFAULT_MIN_PARTY: usize = 1;
    pub const DEFAULT_MAX_PARTY: usize = 3;
    /// Generated durations never drop below one virtual minute.
    pub const MIN_DURATION_SECS: f64 = 60.0;
    pub const MIN_DIFFICULTY: i32 = 1;
    pub const MAX_DIFFICULTY: i32 = 100;
}

pub mod hunters {
    pub const STAT_GROWTH_PER_LEVEL: i32 = 2;
    pub const XP_PER_LEVEL: u32 = 100;
    pub const STARTING_LEVEL: u32 = 1;
}

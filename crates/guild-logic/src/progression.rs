//! Experience gain and level progression.
//!
//! Experience accumulates toward the threshold of the current level. When a
//! grant pushes it past the threshold, the threshold is subtracted and the
//! level increases; this repeats until the remainder is below the threshold
//! for the *new* level, so a single large grant may cascade several levels.
//!
//! ```
//! use guild_logic::progression::{grant_experience, LevelCurve, Progression};
//!
//! let mut p = Progression::new(1, 0);
//! let gained = grant_experience(&mut p, 250, &LevelCurve::flat(100));
//! assert_eq!(gained, 2);
//! assert_eq!(p, Progression::new(3, 50));
//! ```
//!
//! A separate paid promotion path exists for the operator: it costs
//! [`level_up_cost`] gold and grants exactly one level.

use serde::{Deserialize, Serialize};

use crate::constants::hunters::XP_PER_LEVEL;

/// Mutable level state of one hunter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    /// Experience accumulated toward the next level.
    pub xp: u32,
}

impl Progression {
    pub fn new(level: u32, xp: u32) -> Self {
        Self {
            level: level.max(1),
            xp,
        }
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

/// Experience needed to leave each level.
///
/// Currently flat per hunter definition; callers always go through
/// [`LevelCurve::threshold`] so a scaling curve can slot in later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCurve {
    pub xp_per_level: u32,
}

impl LevelCurve {
    pub fn flat(xp_per_level: u32) -> Self {
        Self { xp_per_level }
    }

    /// Threshold for promotion out of `level`. Never zero.
    pub fn threshold(&self, _level: u32) -> u32 {
        self.xp_per_level.max(1)
    }
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self::flat(XP_PER_LEVEL)
    }
}

/// Add experience and apply every promotion it pays for.
///
/// Returns the number of levels gained.
pub fn grant_experience(progression: &mut Progression, amount: u32, curve: &LevelCurve) -> u32 {
    progression.xp = progression.xp.saturating_add(amount);
    let mut gained = 0;
    loop {
        let needed = curve.threshold(progression.level);
        if progression.xp < needed {
            break;
        }
        progression.xp -= needed;
        progression.level += 1;
        gained += 1;
    }
    gained
}

/// Whether accumulated experience already covers the next level.
pub fn can_level_from_xp(progression: &Progression, curve: &LevelCurve) -> bool {
    progression.xp >= curve.threshold(progression.level)
}

/// Gold price of a paid promotion: linear in the current level.
pub fn level_up_cost(base_cost: i64, level: u32) -> i64 {
    base_cost * i64::from(level.max(1))
}

/// Fraction of the way to the next level, 0.0–1.0.
pub fn xp_progress(progression: &Progression, curve: &LevelCurve) -> f32 {
    let needed = curve.threshold(progression.level);
    (progression.xp as f32 / needed as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_below_threshold() {
        let mut p = Progression::new(1, 0);
        assert_eq!(grant_experience(&mut p, 40, &LevelCurve::flat(100)), 0);
        assert_eq!(p, Progression::new(1, 40));
    }

    #[test]
    fn test_grant_exact_threshold() {
        let mut p = Progression::new(2, 60);
        assert_eq!(grant_experience(&mut p, 40, &LevelCurve::flat(100)), 1);
        assert_eq!(p, Progression::new(3, 0));
    }

    #[test]
    fn test_cascade_multiple_levels() {
        let mut p = Progression::new(1, 0);
        assert_eq!(grant_experience(&mut p, 250, &LevelCurve::flat(100)), 2);
        assert_eq!(p.level, 3);
        assert_eq!(p.xp, 50);
    }

    #[test]
    fn test_large_grant_terminates() {
        let mut p = Progression::new(1, 0);
        let gained = grant_experience(&mut p, 10_050, &LevelCurve::flat(100));
        assert_eq!(gained, 100);
        assert_eq!(p, Progression::new(101, 50));
    }

    #[test]
    fn test_zero_threshold_is_treated_as_one() {
        let curve = LevelCurve::flat(0);
        assert_eq!(curve.threshold(1), 1);
        let mut p = Progression::new(1, 0);
        assert_eq!(grant_experience(&mut p, 3, &curve), 3);
        assert_eq!(p, Progression::new(4, 0));
    }

    #[test]
    fn test_level_floor_is_one() {
        assert_eq!(Progression::new(0, 5).level, 1);
    }

    #[test]
    fn test_level_up_cost_linear() {
        assert_eq!(level_up_cost(100, 1), 100);
        assert_eq!(level_up_cost(100, 4), 400);
        assert_eq!(level_up_cost(100, 0), 100);
    }

    #[test]
    fn test_can_level_from_xp() {
        let curve = LevelCurve::flat(100);
        assert!(!can_level_from_xp(&Progression::new(1, 99), &curve));
        assert!(can_level_from_xp(&Progression::new(1, 100), &curve));
    }

    #[test]
    fn test_xp_progress() {
        let curve = LevelCurve::flat(200);
        assert!((xp_progress(&Progression::new(1, 50), &curve) - 0.25).abs() < 1e-6);
        assert_eq!(xp_progress(&Progression::new(1, 0), &curve), 0.0);
    }
}

//! Weighted selection and bounded variance.
//!
//! Both difficulty tiers and monster variants are drawn with the same rule:
//! every weight counts as at least 1, a roll is taken in `[0, total)`, and the
//! first entry whose cumulative weight strictly exceeds the roll wins. If the
//! cumulative loop never exceeds the roll the **last** candidate is returned;
//! that fallback is the canonical tie-break and is kept for reproducibility.
//!
//! ```
//! use guild_logic::weighting::select_by_roll;
//!
//! // weights [1, 3]: roll 0 hits the first entry, rolls 1..=3 the second
//! assert_eq!(select_by_roll(&[1, 3], 0), Some(0));
//! assert_eq!(select_by_roll(&[1, 3], 2), Some(1));
//! // out-of-range rolls fall back to the last candidate
//! assert_eq!(select_by_roll(&[1, 3], 99), Some(1));
//! ```

use rand::Rng;

/// Effective weight of an entry; zero weights still get a chance.
pub fn effective_weight(weight: u32) -> u64 {
    u64::from(weight.max(1))
}

/// Sum of effective weights.
pub fn total_weight(weights: &[u32]) -> u64 {
    weights.iter().map(|&w| effective_weight(w)).sum()
}

/// Map a roll onto an index using cumulative effective weights.
///
/// Returns `None` only for an empty slice.
pub fn select_by_roll(weights: &[u32], roll: u64) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let mut cumulative = 0u64;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += effective_weight(w);
        if roll < cumulative {
            return Some(i);
        }
    }
    Some(weights.len() - 1)
}

/// Draw an index with probability proportional to its effective weight.
pub fn weighted_index(weights: &[u32], rng: &mut impl Rng) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let roll = rng.gen_range(0..total_weight(weights));
    select_by_roll(weights, roll)
}

/// Draw one item from a slice using a weight accessor.
pub fn pick_weighted<'a, T>(
    items: &'a [T],
    weight: impl Fn(&T) -> u32,
    rng: &mut impl Rng,
) -> Option<&'a T> {
    let weights: Vec<u32> = items.iter().map(weight).collect();
    weighted_index(&weights, rng).map(|i| &items[i])
}

/// `base ± variance`, inclusive on both ends. Non-positive variance is exact.
pub fn vary_int(base: i64, variance: i64, rng: &mut impl Rng) -> i64 {
    if variance <= 0 {
        return base;
    }
    base + rng.gen_range(-variance..=variance)
}

/// `base ± variance` for durations, in virtual seconds.
pub fn vary_secs(base: f64, variance: f64, rng: &mut impl Rng) -> f64 {
    if variance <= 0.0 || !variance.is_finite() {
        return base;
    }
    base + rng.gen_range(-variance..=variance)
}

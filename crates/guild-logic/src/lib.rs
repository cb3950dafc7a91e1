//! Pure simulation logic for Guildhall.
//!
//! This crate contains the guild's balance math independent of any clock,
//! roster storage, or engine state. Functions take plain data (and a
//! caller-supplied `rand::Rng` where a roll is involved) and return results,
//! making them unit-testable and reproducible under a seeded generator.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`constants`] | Default balance values (chances, multipliers, costs) |
//! | [`progression`] | Experience cascade, level thresholds, paid promotion cost |
//! | [`resolution`] | Success chance, outcome roll, rewards, casualty risk |
//! | [`stats`] | Base stats, per-level growth, trait modifiers, combat strength |
//! | [`weighting`] | Weighted index draw and bounded symmetric variance |

pub mod constants;
pub mod progression;
pub mod resolution;
pub mod stats;
pub mod weighting;

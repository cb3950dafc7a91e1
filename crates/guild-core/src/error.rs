//! Error types.
//!
//! Every mutating engine operation is fail-closed: it either applies in full
//! or returns a [`GuildError`] and leaves all state untouched.

use thiserror::Error;

use crate::orders::{OrderId, OrderState};
use crate::roster::{HunterId, HunterState};

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, GuildError>;

/// Why a caller-invoked operation was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuildError {
    #[error("unknown order {0}")]
    UnknownOrder(OrderId),

    #[error("unknown hunter {0}")]
    UnknownHunter(HunterId),

    #[error("cannot {action} order {order} in state {state:?}")]
    InvalidTransition {
        order: OrderId,
        state: OrderState,
        action: &'static str,
    },

    #[error("party of {size} is outside the allowed {min}..={max}")]
    PartySize { size: usize, min: usize, max: usize },

    #[error("hunter {0} appears in the party more than once")]
    DuplicateMember(HunterId),

    #[error("hunter {hunter} is {state:?}, not available")]
    HunterUnavailable { hunter: HunterId, state: HunterState },

    #[error("party already has {max} members")]
    PartyFull { max: usize },

    #[error("hunter {0} is not in the party")]
    NotInParty(HunterId),

    #[error("needs {needed} gold, only {available} available")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("amount {0} is not a valid debit")]
    InvalidAmount(i64),

    #[error("hunter {0} is deceased")]
    HunterDeceased(HunterId),
}

/// Problems found while loading balance data or configuration.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("hunter '{hunter}' references unknown trait '{trait_id}'")]
    UnknownTrait { hunter: String, trait_id: String },

    #[error("difficulty tier {index}: {reason}")]
    InvalidTier { index: usize, reason: String },

    #[error("hunter '{hunter}': {reason}")]
    InvalidHunter { hunter: String, reason: String },

    #[error("config field '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

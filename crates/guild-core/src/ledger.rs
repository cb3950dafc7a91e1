//! Economy ledger - gold and standing.
//!
//! Both counters are non-negative integers. Gold can be credited and debited;
//! standing only grows. Every successful mutation emits a [`LedgerEvent`]
//! carrying the new balance.

use crate::error::{GuildError, Result};
use crate::events::{EventBus, LedgerEvent};

/// Guild treasury and reputation.
#[derive(Debug, Default)]
pub struct Ledger {
    gold: i64,
    standing: i64,
    events: EventBus<LedgerEvent>,
}

impl Ledger {
    pub fn new(gold: i64, standing: i64) -> Self {
        Self {
            gold: gold.max(0),
            standing: standing.max(0),
            events: EventBus::new(),
        }
    }

    pub fn gold(&self) -> i64 {
        self.gold
    }

    pub fn standing(&self) -> i64 {
        self.standing
    }

    pub fn can_afford(&self, amount: i64) -> bool {
        amount >= 0 && amount <= self.gold
    }

    /// Add gold. The balance is floored at zero, so a negative credit can
    /// drain the treasury but never overdraw it.
    pub fn credit_gold(&mut self, amount: i64) -> i64 {
        self.gold = self.gold.saturating_add(amount).max(0);
        self.events.emit(&LedgerEvent::GoldChanged(self.gold));
        self.gold
    }

    /// Remove gold only if `0 <= amount <= balance`; otherwise nothing changes.
    pub fn debit_gold(&mut self, amount: i64) -> Result<i64> {
        if amount < 0 {
            return Err(GuildError::InvalidAmount(amount));
        }
        if amount > self.gold {
            return Err(GuildError::InsufficientFunds {
                needed: amount,
                available: self.gold,
            });
        }
        self.gold -= amount;
        self.events.emit(&LedgerEvent::GoldChanged(self.gold));
        Ok(self.gold)
    }

    /// Add standing, floored at zero.
    pub fn credit_standing(&mut self, amount: i64) -> i64 {
        self.standing = self.standing.saturating_add(amount).max(0);
        self.events.emit(&LedgerEvent::StandingChanged(self.standing));
        self.standing
    }

    pub fn events_mut(&mut self) -> &mut EventBus<LedgerEvent> {
        &mut self.events
    }
}

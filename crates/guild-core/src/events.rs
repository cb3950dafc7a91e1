//! Change notifications.
//!
//! Each stateful component owns an [`EventBus`] for its own event type.
//! Delivery is synchronous and in-process: `emit` returns only after every
//! subscriber has seen the event, so observers always see changes in the
//! order they were applied. Subscribers cannot reach back into the engine;
//! they are meant for presentation refresh and logging.

use std::fmt;

use crate::orders::{OrderId, OrderState};
use crate::report::MissionReport;
use crate::roster::{HunterId, HunterState};

type Subscriber<E> = Box<dyn FnMut(&E) + Send>;

/// Ordered fan-out of events to subscribers.
pub struct EventBus<E> {
    subscribers: Vec<Subscriber<E>>,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Register a subscriber. Subscribers are called in registration order.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&E) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Deliver one event to every subscriber.
    pub fn emit(&mut self, event: &E) {
        for subscriber in &mut self.subscribers {
            subscriber(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Virtual clock notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// A new virtual day began (day 0 fires once at startup).
    DayStarted(u64),
}

/// Ledger balance changes. Each carries the new balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEvent {
    GoldChanged(i64),
    StandingChanged(i64),
}

/// Roster membership and hunter state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterEvent {
    Recruited { hunter: HunterId, definition: String },
    StateChanged { hunter: HunterId, state: HunterState },
    LeveledUp { hunter: HunterId, level: u32 },
}

/// Order-set changes and mission reports.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderEvent {
    Offered(OrderId),
    Accepted(OrderId),
    Dispatched(OrderId),
    /// The order reached a terminal state and left active tracking.
    Closed { order: OrderId, state: OrderState },
    MissionResolved(MissionReport),
}

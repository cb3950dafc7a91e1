use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::CountdownId;
use crate::roster::HunterId;

/// Monotonically assigned order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Order lifecycle state.
///
/// ```text
/// Offered ─accept─▶ Accepted ─dispatch─▶ Dispatched ─▶ Completed | Failed
///    │                  └─staffing expiry─▶ Expired
///    └─▶ Declined | Referred
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderState {
    Offered,
    Accepted,
    Dispatched,
    Completed,
    Failed,
    Expired,
    Declined,
    Referred,
}

impl OrderState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Expired | Self::Declined | Self::Referred
        )
    }

    /// Accepted or dispatched.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Accepted | Self::Dispatched)
    }
}

/// Generated parameters of an order. Immutable once offered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSpec {
    pub title: String,
    pub description: String,
    /// Monster definition id, if the order targets a known monster.
    pub monster: Option<String>,
    pub difficulty: i32,
    pub gold_reward: i64,
    pub xp_reward: u32,
    /// Staffing window, virtual seconds.
    pub staffing_secs: f64,
    /// Mission duration, virtual seconds.
    pub mission_secs: f64,
    pub min_party: usize,
    pub max_party: usize,
}

/// A tracked order.
///
/// The assigned party is empty in every state except `Dispatched`, and the
/// order holds at most one countdown handle at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    spec: OrderSpec,
    state: OrderState,
    party: Vec<HunterId>,
    countdown: Option<CountdownId>,
}

impl Order {
    pub(crate) fn new(id: OrderId, spec: OrderSpec) -> Self {
        Self {
            id,
            spec,
            state: OrderState::Offered,
            party: Vec::new(),
            countdown: None,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn spec(&self) -> &OrderSpec {
        &self.spec
    }

    pub fn title(&self) -> &str {
        &self.spec.title
    }

    pub fn difficulty(&self) -> i32 {
        self.spec.difficulty
    }

    pub fn state(&self) -> OrderState {
        self.state
    }

    pub fn party(&self) -> &[HunterId] {
        &self.party
    }

    pub fn countdown(&self) -> Option<CountdownId> {
        self.countdown
    }

    pub(crate) fn set_state(&mut self, state: OrderState) {
        self.state = state;
    }

    pub(crate) fn set_countdown(&mut self, countdown: Option<CountdownId>) {
        self.countdown = countdown;
    }

    pub(crate) fn assign_party(&mut self, party: Vec<HunterId>) {
        self.party = party;
    }

    pub(crate) fn take_party(&mut self) -> Vec<HunterId> {
        std::mem::take(&mut self.party)
    }
}

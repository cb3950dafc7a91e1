//! Guildhall Core - Guild Contract Economy Engine
//!
//! A tick-driven simulation of a hunters' guild: clients offer time-bounded
//! orders, the operator staffs and dispatches parties of hunters, and
//! missions resolve probabilistically into gold, standing, experience, and
//! casualties.
//!
//! # Architecture
//!
//! - **Clock**: scaled virtual time plus a registry of one-shot countdowns
//! - **Ledger**: gold and standing counters with guarded debits
//! - **Roster**: hunters as `hecs` entities (profile, progression, state)
//! - **Orders**: generator and the board that runs the order state machine
//! - **Resolver**: pure mission roll, then application to roster and ledger
//!
//! [`engine::GuildEngine`] owns all of them and passes each component the
//! collaborators it needs explicitly.
//!
//! # Example
//!
//! ```rust,no_run
//! use guild_core::prelude::*;
//!
//! let data = GameData::from_json_str(include_str!("../../../data/balance.json")).unwrap();
//! let mut engine = GuildEngine::new(data, GuildConfig::seeded(42)).unwrap();
//! engine.start();
//!
//! let order = engine.generate_order();
//! engine.accept(order).unwrap();
//! let hunter = engine.roster().available()[0];
//! engine.dispatch(order, &[hunter]).unwrap();
//!
//! loop {
//!     for report in engine.update(1.0 / 60.0).reports {
//!         println!("{}: success={}", report.title, report.success);
//!     }
//! }
//! ```

pub mod clock;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod events;
pub mod ledger;
pub mod orders;
pub mod party;
pub mod report;
pub mod resolver;
pub mod roster;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::clock::{Clock, CountdownId, CountdownPurpose};
    pub use crate::config::{GenerationConfig, GuildConfig};
    pub use crate::data::GameData;
    pub use crate::engine::{GuildEngine, UpdateSummary};
    pub use crate::error::{DataError, GuildError};
    pub use crate::events::{ClockEvent, LedgerEvent, OrderEvent, RosterEvent};
    pub use crate::ledger::Ledger;
    pub use crate::orders::{Order, OrderBoard, OrderId, OrderSink, OrderSpec, OrderState};
    pub use crate::party::{PartyFormation, PartyPreview};
    pub use crate::report::{HistorySummary, MissionReport};
    pub use crate::roster::{HunterId, HunterState, Roster};
}

//! Orders - the contract model, its generator, and the board that runs the
//! order state machine.

mod board;
mod generator;
mod order;

pub use board::{BoardStats, OrderBoard, OrderSink};
pub use generator::{fallback_spec, generate_spec};
pub use order::{Order, OrderId, OrderSpec, OrderState};

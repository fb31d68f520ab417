//! Order book infrastructure module
//!
//! Contains the per-level FIFO queue, price levels, and the two-sided
//! ladder implementation with its priority structure.

pub mod crossing;
mod heap;
pub mod ladder;
pub mod level;
pub mod queue;

pub use ladder::Ladder;
pub use level::Level;
pub use queue::{OrderQueue, RestingOrder};

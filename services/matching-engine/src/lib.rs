//! Matching Engine
//!
//! Single-instrument continuous limit order book with price-time priority
//! matching. Orders are matched against the opposite side of the book;
//! residual limit quantity rests, residual market quantity is discarded
//! and reported. The engine retains every order it has seen and exposes
//! depth-limited market snapshots.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced (FIFO within a price level)
//! - The book is never crossed at rest
//! - Executed quantity never decreases and never exceeds the original
//! - A single lock serialises matching, cancellation and snapshots

pub mod book;
pub mod config;
pub mod engine;
pub mod events;
mod registry;
pub mod snapshot;

pub use config::EngineConfig;
pub use engine::MatchingEngine;
pub use events::{ExecutionReport, Matches};
pub use snapshot::{LevelView, Snapshot, DEFAULT_SNAPSHOT_DEPTH};

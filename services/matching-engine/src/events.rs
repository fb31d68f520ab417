//! Execution results reported back to the submitter
//!
//! A submission yields the taker's post-execution record plus the fills
//! it caused, aggregated per maker. Consumers that need an ordered trade
//! tape would extend this to a sequence; the engine itself only promises
//! per-call aggregation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use types::ids::OrderId;
use types::numeric::Quantity;
use types::order::Order;

/// Aggregate fills per maker for one submission
///
/// Maps each maker identifier to the total quantity that maker filled
/// during a single call. FIFO micro-ordering within the call is not
/// retained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matches {
    fills: HashMap<OrderId, Quantity>,
}

impl Matches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fill for the given maker
    pub(crate) fn record(&mut self, maker: OrderId, quantity: Quantity) {
        let filled = self.fills.entry(maker).or_insert(Quantity::ZERO);
        *filled = *filled + quantity;
    }

    /// Fold another batch of fills into this one
    pub(crate) fn merge(&mut self, other: Matches) {
        for (maker, quantity) in other.fills {
            self.record(maker, quantity);
        }
    }

    /// Quantity filled by the given maker, if it was matched
    pub fn get(&self, maker: &OrderId) -> Option<Quantity> {
        self.fills.get(maker).copied()
    }

    /// Iterate (maker, filled quantity) pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&OrderId, &Quantity)> {
        self.fills.iter()
    }

    /// Number of distinct makers filled
    pub fn len(&self) -> usize {
        self.fills.len()
    }

    /// Check if no maker was filled
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }

    /// Total quantity filled across all makers
    pub fn total_quantity(&self) -> Quantity {
        self.fills.values().fold(Quantity::ZERO, |acc, &q| acc + q)
    }
}

/// The outcome of a successful submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// The taker's post-execution record, as stored in the registry
    pub taker: Order,
    /// Aggregate fills per maker
    pub fills: Matches,
}

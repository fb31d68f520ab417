//! Depth-limited market snapshot types

use serde::{Deserialize, Serialize};
use types::numeric::{Price, Quantity};

/// Depth collaborators conventionally ask for when they pass none
pub const DEFAULT_SNAPSHOT_DEPTH: usize = 20;

/// One aggregated price level as seen by the market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelView {
    pub price: Price,
    /// Total remaining quantity across all orders at this price
    pub quantity: Quantity,
}

/// A depth-limited view of both sides of the book
///
/// Asks are ordered ascending by price (best first), bids descending
/// (best first). Each side holds at most the requested depth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub asks: Vec<LevelView>,
    pub bids: Vec<LevelView>,
}

impl Snapshot {
    /// Check if both sides are empty
    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = Snapshot {
            asks: vec![LevelView {
                price: Price::from_u64(101),
                quantity: Quantity::from_u64(3),
            }],
            bids: vec![LevelView {
                price: Price::from_u64(100),
                quantity: Quantity::from_u64(2),
            }],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(
            json,
            r#"{"asks":[{"price":"101","quantity":"3"}],"bids":[{"price":"100","quantity":"2"}]}"#
        );

        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_empty_snapshot() {
        assert!(Snapshot::default().is_empty());
    }
}

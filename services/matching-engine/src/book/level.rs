//! Price level: all resting orders at one price on one side
//!
//! The ordering key is the price for the ask side and the negated price
//! for the bid side, so a single min-comparison yields "most aggressive
//! first" on both sides.

use super::queue::OrderQueue;
use rust_decimal::Decimal;
use types::numeric::{Price, Quantity};
use types::order::Side;

/// A price level containing orders at a specific price
#[derive(Debug, Clone)]
pub struct Level {
    price: Price,
    side: Side,
    /// FIFO queue of resting orders at this price
    pub(crate) orders: OrderQueue,
    /// Position of this level inside its ladder's heap; maintained by
    /// the heap on every move so removal can find the slot in O(1)
    pub(crate) heap_slot: usize,
}

impl Level {
    pub(crate) fn new(price: Price, side: Side, queue_capacity: usize) -> Self {
        Self {
            price,
            side,
            orders: OrderQueue::with_capacity(queue_capacity),
            heap_slot: usize::MAX,
        }
    }

    /// The price shared by every order at this level
    pub fn price(&self) -> Price {
        self.price
    }

    /// Which side of the book this level belongs to
    pub fn side(&self) -> Side {
        self.side
    }

    /// Priority key: ascending for asks, descending for bids
    pub(crate) fn key(&self) -> Decimal {
        match self.side {
            Side::Sell => self.price.as_decimal(),
            Side::Buy => -self.price.as_decimal(),
        }
    }

    /// Sum of remaining quantity over the queue
    pub fn total_quantity(&self) -> Quantity {
        self.orders.total_quantity()
    }

    /// Number of orders at this level
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Check if the level holds no orders
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::OrderId;

    #[test]
    fn test_key_ascending_for_asks() {
        let level = Level::new(Price::from_u64(100), Side::Sell, 4);
        assert_eq!(level.key(), Decimal::from(100));
    }

    #[test]
    fn test_key_descending_for_bids() {
        let level = Level::new(Price::from_u64(100), Side::Buy, 4);
        assert_eq!(level.key(), Decimal::from(-100));
    }

    #[test]
    fn test_bid_priority_prefers_higher_price() {
        let high = Level::new(Price::from_u64(101), Side::Buy, 4);
        let low = Level::new(Price::from_u64(99), Side::Buy, 4);
        assert!(high.key() < low.key());
    }

    #[test]
    fn test_total_quantity_sums_queue() {
        let mut level = Level::new(Price::from_u64(100), Side::Sell, 4);
        level.orders.push(OrderId::from("a"), Quantity::from_u64(2));
        level.orders.push(OrderId::from("b"), Quantity::from_u64(3));

        assert_eq!(level.total_quantity(), Quantity::from_u64(5));
        assert_eq!(level.order_count(), 2);
        assert!(!level.is_empty());
    }
}

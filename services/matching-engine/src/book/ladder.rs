//! One side of the order book
//!
//! A ladder keeps every price level of one side twice over: a map from
//! the price's raw integer form to the level (exact lookup, no decimal
//! equality ambiguity) and a heap ordered most-aggressive-first (the
//! matching driver and snapshots). Both structures hold slab arena keys;
//! a level exists in one iff it exists in the other, and only while its
//! queue is non-empty.

use super::heap::LevelHeap;
use super::level::Level;
use super::queue::RestingOrder;
use crate::config::{DEFAULT_LADDER_CAPACITY, DEFAULT_LEVEL_CAPACITY};
use crate::events::Matches;
use slab::Slab;
use std::collections::HashMap;
use tracing::trace;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Side;

/// All price levels and resting orders of one side of the book
#[derive(Debug)]
pub struct Ladder {
    side: Side,
    arena: Slab<Level>,
    /// Price raw form → arena key
    map: HashMap<i128, usize>,
    heap: LevelHeap,
    level_capacity: usize,
}

impl Ladder {
    /// Create an empty ladder for the given side
    pub fn new(side: Side) -> Self {
        Self::with_capacity(side, DEFAULT_LADDER_CAPACITY, DEFAULT_LEVEL_CAPACITY)
    }

    /// Create an empty ladder with explicit capacity hints
    pub fn with_capacity(side: Side, ladder_capacity: usize, level_capacity: usize) -> Self {
        Self {
            side,
            arena: Slab::with_capacity(ladder_capacity),
            map: HashMap::with_capacity(ladder_capacity),
            heap: LevelHeap::with_capacity(ladder_capacity),
            level_capacity,
        }
    }

    /// Which side of the book this ladder holds
    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of live price levels
    pub fn level_count(&self) -> usize {
        self.arena.len()
    }

    /// Check if the ladder holds no levels
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// The most aggressive resting price, if any
    pub fn best_price(&self) -> Option<Price> {
        self.heap.peek().map(|key| self.arena[key].price())
    }

    /// Queue an order at the given price
    ///
    /// Creates the level on first use. Returns false if an order with
    /// this identifier is already queued at that price.
    pub fn add_order(&mut self, price: Price, id: OrderId, quantity: Quantity) -> bool {
        if let Some(&key) = self.map.get(&price.raw()) {
            return self.arena[key].orders.push(id, quantity);
        }

        let mut level = Level::new(price, self.side, self.level_capacity);
        let added = level.orders.push(id, quantity);
        debug_assert!(added, "fresh level rejected its first order");

        let key = self.arena.insert(level);
        self.map.insert(price.raw(), key);
        self.heap.push(&mut self.arena, key);

        added
    }

    /// Remove an order by identifier from the level at the given price
    ///
    /// Destroys the level if its queue empties. Returns false if no such
    /// order is resting there.
    pub fn remove_order(&mut self, price: Price, id: &OrderId) -> bool {
        let Some(&key) = self.map.get(&price.raw()) else {
            return false;
        };

        let removed = self.arena[key].orders.remove_by_id(id);

        if self.arena[key].orders.is_empty() {
            let heap_slot = self.arena[key].heap_slot;
            self.map.remove(&price.raw());
            let popped = self.heap.remove(&mut self.arena, heap_slot);
            assert!(
                popped == Some(key),
                "ladder heap out of sync at price {price}"
            );
            self.arena.remove(key);
        }

        removed
    }

    /// Look up a resting order at the given price
    pub fn get_order(&self, price: Price, id: &OrderId) -> Option<&RestingOrder> {
        let &key = self.map.get(&price.raw())?;
        self.arena[key].orders.get(id)
    }

    /// Match the taker quantity against the level at exactly this price
    ///
    /// Makers are consumed in FIFO order; fully consumed makers are
    /// removed afterwards, and the level is destroyed if it empties.
    /// Returns the taker's residual quantity and the per-maker fills.
    pub fn match_limit(&mut self, price: Price, quantity: Quantity) -> (Quantity, Matches) {
        let mut remaining = quantity;
        let mut matches = Matches::new();

        let Some(&key) = self.map.get(&price.raw()) else {
            return (remaining, matches);
        };

        let mut consumed = Vec::new();
        for maker in self.arena[key].orders.iter_mut() {
            if !remaining.is_positive() {
                break;
            }

            if remaining <= maker.remaining {
                // Taker fully executed; maker keeps whatever is left.
                maker.remaining = maker.remaining - remaining;
                matches.record(maker.id.clone(), remaining);
                trace!(maker = %maker.id, filled = %remaining, price = %price, "maker matched");
                remaining = Quantity::ZERO;
                if maker.remaining.is_zero() {
                    consumed.push(maker.id.clone());
                }
                break;
            }

            // Maker fully executed; taker moves on down the queue.
            let filled = maker.remaining;
            maker.remaining = Quantity::ZERO;
            remaining = remaining - filled;
            matches.record(maker.id.clone(), filled);
            trace!(maker = %maker.id, filled = %filled, price = %price, "maker matched");
            consumed.push(maker.id.clone());
        }

        for id in &consumed {
            let removed = self.remove_order(price, id);
            debug_assert!(removed, "consumed maker vanished before removal");
        }

        (remaining, matches)
    }

    /// Match the taker quantity against successive best levels while
    /// they cross the taker's limit price
    ///
    /// Stops as soon as the taker is filled, the ladder is empty, or the
    /// best resting price no longer crosses the limit. Fills happen at
    /// the resting (maker) prices.
    pub fn match_crossing(&mut self, limit: Price, quantity: Quantity) -> (Quantity, Matches) {
        let taker_side = self.side.opposite();
        let mut remaining = quantity;
        let mut matches = Matches::new();

        while remaining.is_positive() {
            let Some(best) = self.best_price() else {
                break;
            };
            if !super::crossing::can_match(taker_side, limit, best) {
                break;
            }

            let (residual, fills) = self.match_limit(best, remaining);
            remaining = residual;
            matches.merge(fills);
        }

        (remaining, matches)
    }

    /// Match the taker quantity against the whole ladder, best price
    /// first, until the taker is filled or the ladder is empty
    pub fn match_market(&mut self, quantity: Quantity) -> (Quantity, Matches) {
        let mut remaining = quantity;
        let mut matches = Matches::new();

        while remaining.is_positive() {
            let Some(price) = self.best_price() else {
                break;
            };

            let (residual, fills) = self.match_limit(price, remaining);
            remaining = residual;
            matches.merge(fills);
        }

        (remaining, matches)
    }

    /// Visit levels in priority order until `f` returns false
    pub fn walk<F>(&self, f: F)
    where
        F: FnMut(&Level) -> bool,
    {
        self.heap.walk(&self.arena, f);
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.map.len(), self.heap.len());
        assert_eq!(self.map.len(), self.arena.len());

        for (&raw, &key) in &self.map {
            let level = &self.arena[key];
            assert_eq!(level.price().raw(), raw);
            assert!(!level.is_empty());
            assert_eq!(self.heap.slot_at(level.heap_slot), Some(key));
        }
    }
}

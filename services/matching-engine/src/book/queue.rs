//! Per-level FIFO order queue with indexed removal
//!
//! Orders at one price level are kept in submission order for time
//! priority. Removal by identifier does not scan: each order is stamped
//! with a monotonically increasing insertion index on entry, an id→index
//! map remembers the stamp, and because the queue is always sorted by
//! insertion index a binary search locates the order in O(log n).

use std::collections::HashMap;
use types::ids::OrderId;
use types::numeric::Quantity;

/// An order resting inside a price level
///
/// Only the data matching needs: the identifier, the quantity still
/// open, and the index assigned when the order entered the queue.
#[derive(Debug, Clone, PartialEq)]
pub struct RestingOrder {
    pub id: OrderId,
    pub remaining: Quantity,
    insertion_index: u64,
}

impl RestingOrder {
    /// The index stamped on this order when it entered its queue
    pub fn insertion_index(&self) -> u64 {
        self.insertion_index
    }
}

/// FIFO queue of resting orders with O(log n) removal by identifier
///
/// The queue vector and the id→index map must always agree on length;
/// disagreement means the book is corrupt and the engine must not
/// continue.
#[derive(Debug, Clone)]
pub struct OrderQueue {
    orders: Vec<RestingOrder>,
    indices: HashMap<OrderId, u64>,
    next_index: u64,
}

impl OrderQueue {
    /// Create an empty queue with room for `capacity` orders
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: Vec::with_capacity(capacity),
            indices: HashMap::with_capacity(capacity),
            next_index: 0,
        }
    }

    /// Append an order at the back of the queue
    ///
    /// Returns false without modifying anything if an order with this
    /// identifier is already queued.
    pub fn push(&mut self, id: OrderId, quantity: Quantity) -> bool {
        if self.indices.contains_key(&id) {
            return false;
        }

        let insertion_index = self.next_index;
        self.next_index += 1;

        self.indices.insert(id.clone(), insertion_index);
        self.orders.push(RestingOrder {
            id,
            remaining: quantity,
            insertion_index,
        });

        true
    }

    /// Remove an order by identifier
    ///
    /// Returns false if no order with this identifier is queued.
    pub fn remove_by_id(&mut self, id: &OrderId) -> bool {
        let Some(&insertion_index) = self.indices.get(id) else {
            return false;
        };

        // The queue is sorted ascending by insertion index.
        let Ok(position) = self
            .orders
            .binary_search_by_key(&insertion_index, |o| o.insertion_index)
        else {
            return false;
        };

        let order = self.orders.remove(position);
        self.indices.remove(&order.id);

        true
    }

    /// Look up an order by identifier
    pub fn get(&self, id: &OrderId) -> Option<&RestingOrder> {
        let &insertion_index = self.indices.get(id)?;
        let position = self
            .orders
            .binary_search_by_key(&insertion_index, |o| o.insertion_index)
            .ok()?;
        Some(&self.orders[position])
    }

    /// Iterate resting orders in FIFO order
    pub fn iter(&self) -> impl Iterator<Item = &RestingOrder> {
        self.orders.iter()
    }

    /// Iterate resting orders in FIFO order, allowing the caller to
    /// mutate remaining quantities in place during matching
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RestingOrder> {
        self.orders.iter_mut()
    }

    /// Number of queued orders
    ///
    /// # Panics
    /// Panics if the queue and the index map disagree on length; the
    /// book is corrupt at that point and must not continue.
    pub fn len(&self) -> usize {
        assert!(
            self.orders.len() == self.indices.len(),
            "order queue out of sync: queue={} indices={}",
            self.orders.len(),
            self.indices.len()
        );
        self.orders.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of remaining quantity over all queued orders
    pub fn total_quantity(&self) -> Quantity {
        self.orders
            .iter()
            .fold(Quantity::ZERO, |acc, o| acc + o.remaining)
    }
}

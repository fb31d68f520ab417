//! In-memory order registry
//!
//! Maps order identifiers to the client-facing record for the lifetime
//! of the process. Cancellation removes an order's resting form from its
//! ladder; the registry entry stays queryable with the executed quantity
//! it accumulated.

use crate::events::Matches;
use std::collections::HashMap;
use types::ids::OrderId;
use types::order::Order;

#[derive(Debug, Default)]
pub(crate) struct OrderRegistry {
    orders: HashMap<OrderId, Order>,
}

impl OrderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &OrderId) -> bool {
        self.orders.contains_key(id)
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    pub fn insert(&mut self, order: Order) {
        self.orders.insert(order.id.clone(), order);
    }

    /// Credit each maker's executed quantity with its fill
    ///
    /// # Panics
    /// Panics if a maker identifier is unknown: matching reported a fill
    /// for an order the registry never saw, and the engine must not
    /// continue on corrupt state.
    pub fn apply_fills(&mut self, fills: &Matches) {
        for (maker, &quantity) in fills.iter() {
            let order = self
                .orders
                .get_mut(maker)
                .expect("matched maker missing from registry");
            order.executed_quantity = order.executed_quantity + quantity;
        }
    }
}

//! Engine entry point
//!
//! Owns the two ladders and the order registry behind a single mutex:
//! matching must be atomic across map, heap, queues and registry, and a
//! coarse lock keeps that trivially true. Snapshots take the same lock
//! and complete in O(depth log levels), so nothing ever waits on I/O
//! while holding it.

use crate::book::Ladder;
use crate::config::EngineConfig;
use crate::events::ExecutionReport;
use crate::registry::OrderRegistry;
use crate::snapshot::{LevelView, Snapshot};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;
use types::errors::OrderBookError;
use types::ids::OrderId;
use types::numeric::Price;
use types::order::{Order, OrderType, Side};

/// Single-instrument matching engine
///
/// Safe to share between threads; all operations serialise on one
/// internal lock and behave as if executed in that serial order.
#[derive(Debug)]
pub struct MatchingEngine {
    state: Mutex<BookState>,
}

#[derive(Debug)]
struct BookState {
    asks: Ladder,
    bids: Ladder,
    registry: OrderRegistry,
}

impl BookState {
    /// The taker's own ladder and the one it matches against
    fn ladders_mut(&mut self, side: Side) -> (&mut Ladder, &mut Ladder) {
        match side {
            Side::Buy => (&mut self.bids, &mut self.asks),
            Side::Sell => (&mut self.asks, &mut self.bids),
        }
    }
}

impl MatchingEngine {
    /// Create an engine with default capacity hints
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with explicit capacity hints
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            state: Mutex::new(BookState {
                asks: Ladder::with_capacity(
                    Side::Sell,
                    config.ladder_capacity,
                    config.level_capacity,
                ),
                bids: Ladder::with_capacity(
                    Side::Buy,
                    config.ladder_capacity,
                    config.level_capacity,
                ),
                registry: OrderRegistry::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, BookState> {
        // A poisoned lock means a panic already fired mid-mutation; the
        // book may be corrupt and must not be used further.
        self.state.lock().expect("engine state lock poisoned")
    }

    /// Submit an order and match it against the opposite side
    ///
    /// A limit order matches resting orders whose prices cross its
    /// limit; any residual rests on its own side. A market order
    /// consumes the best available prices; if the book runs dry first,
    /// the executed fraction is committed and
    /// [`OrderBookError::MarketOrderNotFullyExecuted`] is returned while
    /// the residual is discarded.
    pub fn submit_order(&self, order: Order) -> Result<ExecutionReport, OrderBookError> {
        Self::validate(&order)?;

        let mut state = self.state();

        if state.registry.contains(&order.id) {
            return Err(OrderBookError::OrderExists(order.id));
        }

        let quantity = order.original_quantity;
        let (residual, fills) = {
            let (own, opposite) = state.ladders_mut(order.side);
            match order.order_type {
                OrderType::Market => {
                    if !order.price.is_zero() {
                        return Err(OrderBookError::MarketOrderHasPrice);
                    }
                    opposite.match_market(quantity)
                }
                OrderType::Limit => {
                    let (residual, fills) = opposite.match_crossing(order.price, quantity);
                    if residual.is_positive() {
                        let rested = own.add_order(order.price, order.id.clone(), residual);
                        assert!(rested, "resting order id collided inside ladder");
                    }
                    (residual, fills)
                }
            }
        };

        let mut taker = order;
        taker.executed_quantity = taker.original_quantity - residual;

        state.registry.insert(taker.clone());
        state.registry.apply_fills(&fills);

        debug!(
            id = %taker.id,
            side = ?taker.side,
            executed = %taker.executed_quantity,
            makers = fills.len(),
            "order submitted"
        );

        if taker.order_type == OrderType::Market && residual.is_positive() {
            return Err(OrderBookError::MarketOrderNotFullyExecuted);
        }

        Ok(ExecutionReport { taker, fills })
    }

    /// Cancel a resting limit order by identifier
    ///
    /// The registry record is retained; only the resting form leaves the
    /// book. Orders that already left the book (fully filled) are not
    /// eligible.
    pub fn cancel_order(&self, id: &OrderId) -> Result<(), OrderBookError> {
        if id.is_empty() {
            return Err(OrderBookError::InvalidId);
        }

        let mut state = self.state();

        let order = match state.registry.get(id) {
            Some(order) => order.clone(),
            None => return Err(OrderBookError::OrderDoesNotExist(id.clone())),
        };

        if order.order_type == OrderType::Market {
            return Err(OrderBookError::CannotCancelMarketOrder);
        }

        let (own, _) = state.ladders_mut(order.side);
        if own.remove_order(order.price, id) {
            debug!(id = %id, "order canceled");
            Ok(())
        } else {
            Err(OrderBookError::CannotCancelOrder(id.clone()))
        }
    }

    /// Fetch the registry record for an order
    pub fn get_order(&self, id: &OrderId) -> Result<Order, OrderBookError> {
        self.state()
            .registry
            .get(id)
            .cloned()
            .ok_or_else(|| OrderBookError::OrderDoesNotExist(id.clone()))
    }

    /// A depth-limited snapshot of both sides
    ///
    /// Asks come back ascending by price, bids descending; each side
    /// holds at most `depth` levels.
    pub fn snapshot(&self, depth: usize) -> Snapshot {
        let state = self.state();

        let mut asks = Vec::with_capacity(depth.min(state.asks.level_count()));
        state.asks.walk(|level| {
            if asks.len() >= depth {
                return false;
            }
            asks.push(LevelView {
                price: level.price(),
                quantity: level.total_quantity(),
            });
            true
        });

        let mut bids = Vec::with_capacity(depth.min(state.bids.level_count()));
        state.bids.walk(|level| {
            if bids.len() >= depth {
                return false;
            }
            bids.push(LevelView {
                price: level.price(),
                quantity: level.total_quantity(),
            });
            true
        });

        Snapshot { asks, bids }
    }

    /// Best resting bid price, if any
    pub fn best_bid(&self) -> Option<Price> {
        self.state().bids.best_price()
    }

    /// Best resting ask price, if any
    pub fn best_ask(&self) -> Option<Price> {
        self.state().asks.best_price()
    }

    fn validate(order: &Order) -> Result<(), OrderBookError> {
        if !order.original_quantity.is_positive() {
            return Err(OrderBookError::InvalidQuantity);
        }
        if !order.executed_quantity.is_zero() {
            return Err(OrderBookError::InvalidQuantity);
        }
        if order.id.is_empty() {
            return Err(OrderBookError::InvalidId);
        }
        Ok(())
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

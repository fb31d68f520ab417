//! Property-based tests for order book invariants
//!
//! Drives the public engine API with random operation sequences and
//! compares it against a small reference model built on BTreeMap. After
//! every operation the engine must agree with the model on resting
//! state and executed quantities, snapshots must be strictly ordered,
//! and the book must never be crossed at rest.

use matching_engine::MatchingEngine;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use types::errors::OrderBookError;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

#[derive(Debug, Clone)]
enum Op {
    Limit { buy: bool, price: u64, quantity: u64 },
    Market { buy: bool, quantity: u64 },
    Cancel { target: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<bool>(), 90u64..=110u64, 1u64..=10u64)
            .prop_map(|(buy, price, quantity)| Op::Limit { buy, price, quantity }),
        1 => (any::<bool>(), 1u64..=15u64)
            .prop_map(|(buy, quantity)| Op::Market { buy, quantity }),
        2 => (0usize..70usize).prop_map(|target| Op::Cancel { target }),
    ]
}

/// Reference model: FIFO queues per price in ordered maps
#[derive(Default)]
struct Model {
    bids: BTreeMap<u64, Vec<(String, u64)>>,
    asks: BTreeMap<u64, Vec<(String, u64)>>,
    executed: HashMap<String, u64>,
    original: HashMap<String, u64>,
}

impl Model {
    fn record(&mut self, id: &str, original: u64, executed: u64) {
        self.original.insert(id.to_string(), original);
        self.executed.insert(id.to_string(), executed);
    }

    /// Consume liquidity best-price-first, FIFO within a level
    ///
    /// `limit` bounds which prices an incoming limit order may reach;
    /// market orders pass None.
    fn consume(&mut self, buy: bool, quantity: u64, limit: Option<u64>) -> u64 {
        let book = if buy { &mut self.asks } else { &mut self.bids };

        let crossing: Vec<u64> = if buy {
            book.keys()
                .filter(|&&p| limit.map_or(true, |l| p <= l))
                .copied()
                .collect()
        } else {
            book.keys()
                .filter(|&&p| limit.map_or(true, |l| p >= l))
                .rev()
                .copied()
                .collect()
        };

        let mut remaining = quantity;
        for price in crossing {
            if remaining == 0 {
                break;
            }
            let queue = book.get_mut(&price).unwrap();
            for (maker, resting) in queue.iter_mut() {
                if remaining == 0 {
                    break;
                }
                let fill = remaining.min(*resting);
                *resting -= fill;
                remaining -= fill;
                *self.executed.get_mut(maker.as_str()).unwrap() += fill;
            }
            queue.retain(|(_, resting)| *resting > 0);
            if queue.is_empty() {
                book.remove(&price);
            }
        }

        quantity - remaining
    }

    fn submit_limit(&mut self, id: &str, buy: bool, price: u64, quantity: u64) -> u64 {
        let executed = self.consume(buy, quantity, Some(price));
        self.record(id, quantity, executed);

        if executed < quantity {
            let book = if buy { &mut self.bids } else { &mut self.asks };
            book.entry(price)
                .or_default()
                .push((id.to_string(), quantity - executed));
        }
        executed
    }

    fn submit_market(&mut self, id: &str, buy: bool, quantity: u64) -> u64 {
        let executed = self.consume(buy, quantity, None);
        self.record(id, quantity, executed);
        executed
    }

    /// Remove a resting order; false if it is not on the book
    fn cancel(&mut self, id: &str) -> bool {
        for book in [&mut self.bids, &mut self.asks] {
            let mut hit = None;
            for (&price, queue) in book.iter_mut() {
                let before = queue.len();
                queue.retain(|(resting_id, _)| resting_id != id);
                if queue.len() < before {
                    hit = Some(price);
                    break;
                }
            }
            if let Some(price) = hit {
                if book.get(&price).is_some_and(|q| q.is_empty()) {
                    book.remove(&price);
                }
                return true;
            }
        }
        false
    }

    fn side_totals(&self, buy: bool) -> Vec<(u64, u64)> {
        let book = if buy { &self.bids } else { &self.asks };
        let totals = book
            .iter()
            .map(|(&price, queue)| (price, queue.iter().map(|(_, q)| q).sum()));
        if buy {
            totals.rev().collect()
        } else {
            totals.collect()
        }
    }
}

fn check_against_model(engine: &MatchingEngine, model: &Model) -> Result<(), TestCaseError> {
    let snapshot = engine.snapshot(1_000);

    // Strict ordering on both sides.
    for pair in snapshot.asks.windows(2) {
        prop_assert!(pair[0].price < pair[1].price, "asks not ascending");
    }
    for pair in snapshot.bids.windows(2) {
        prop_assert!(pair[0].price > pair[1].price, "bids not descending");
    }

    // Never crossed at rest.
    if let (Some(ask), Some(bid)) = (snapshot.asks.first(), snapshot.bids.first()) {
        prop_assert!(ask.price > bid.price, "book crossed at rest");
    }

    // Level-by-level agreement with the model.
    let expect = |buy: bool| -> Vec<(Price, Quantity)> {
        model
            .side_totals(buy)
            .into_iter()
            .map(|(p, q)| (Price::from_u64(p), Quantity::from_u64(q)))
            .collect()
    };
    let engine_side = |views: &[matching_engine::LevelView]| -> Vec<(Price, Quantity)> {
        views.iter().map(|v| (v.price, v.quantity)).collect()
    };
    prop_assert_eq!(engine_side(&snapshot.asks), expect(false), "ask levels diverge");
    prop_assert_eq!(engine_side(&snapshot.bids), expect(true), "bid levels diverge");

    // Registry agreement: executed quantities, bounded by originals.
    for (id, &original) in &model.original {
        let order = engine
            .get_order(&OrderId::from(id.as_str()))
            .expect("model knows an order the engine lost");
        let executed = model.executed[id];
        prop_assert_eq!(order.executed_quantity, Quantity::from_u64(executed));
        prop_assert!(order.executed_quantity <= order.original_quantity);
        prop_assert_eq!(order.original_quantity, Quantity::from_u64(original));
    }

    Ok(())
}

proptest! {
    #[test]
    fn random_operation_sequences_preserve_invariants(
        ops in proptest::collection::vec(op_strategy(), 1..60)
    ) {
        let engine = MatchingEngine::new();
        let mut model = Model::default();
        let mut submitted: Vec<String> = Vec::new();

        for op in ops {
            match op {
                Op::Limit { buy, price, quantity } => {
                    let id = format!("ord-{}", submitted.len());
                    let side = if buy { Side::Buy } else { Side::Sell };
                    let order = Order::limit(
                        id.as_str(),
                        side,
                        Price::from_u64(price),
                        Quantity::from_u64(quantity),
                    );

                    let report = engine.submit_order(order).unwrap();
                    let executed = model.submit_limit(&id, buy, price, quantity);

                    prop_assert_eq!(
                        report.taker.executed_quantity,
                        Quantity::from_u64(executed)
                    );
                    // Conservation: taker executions equal maker fills.
                    prop_assert_eq!(
                        report.fills.total_quantity(),
                        report.taker.executed_quantity
                    );
                    submitted.push(id);
                }
                Op::Market { buy, quantity } => {
                    let id = format!("ord-{}", submitted.len());
                    let side = if buy { Side::Buy } else { Side::Sell };
                    let order = Order::market(id.as_str(), side, Quantity::from_u64(quantity));

                    let result = engine.submit_order(order);
                    let executed = model.submit_market(&id, buy, quantity);

                    match result {
                        Ok(report) => {
                            prop_assert_eq!(executed, quantity);
                            prop_assert_eq!(
                                report.fills.total_quantity(),
                                Quantity::from_u64(executed)
                            );
                        }
                        Err(OrderBookError::MarketOrderNotFullyExecuted) => {
                            prop_assert!(executed < quantity);
                        }
                        Err(other) => prop_assert!(false, "unexpected error: {other}"),
                    }
                    submitted.push(id);
                }
                Op::Cancel { target } => {
                    let id = submitted
                        .get(target)
                        .cloned()
                        .unwrap_or_else(|| format!("missing-{target}"));
                    let order_id = OrderId::from(id.as_str());

                    let result = engine.cancel_order(&order_id);
                    if !model.original.contains_key(&id) {
                        prop_assert_eq!(
                            result,
                            Err(OrderBookError::OrderDoesNotExist(order_id))
                        );
                    } else if model.cancel(&id) {
                        prop_assert_eq!(result, Ok(()));
                        // Cancel is not repeatable once the order left the book.
                        prop_assert_eq!(
                            engine.cancel_order(&order_id),
                            Err(OrderBookError::CannotCancelOrder(order_id))
                        );
                    } else {
                        // Market orders and fully filled or already
                        // canceled limits are not cancelable.
                        prop_assert!(matches!(
                            result,
                            Err(OrderBookError::CannotCancelOrder(_))
                                | Err(OrderBookError::CannotCancelMarketOrder)
                        ));
                    }
                }
            }

            check_against_model(&engine, &model)?;
        }
    }
}

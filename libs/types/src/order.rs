//! Order sides, types and the client-facing order record
//!
//! Sides and order types carry stable wire values (Buy=0, Sell=1;
//! Limit=0, Market=1) and serialize as those integers.

use crate::errors::OrderBookError;
use crate::ids::OrderId;
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl From<Side> for u8 {
    fn from(side: Side) -> u8 {
        match side {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = OrderBookError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Side::Buy),
            1 => Ok(Side::Sell),
            other => Err(OrderBookError::InvalidSide(other)),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OrderType {
    /// Rests at its price if not (fully) matched
    Limit,
    /// Executes immediately against the book, never rests
    Market,
}

impl From<OrderType> for u8 {
    fn from(order_type: OrderType) -> u8 {
        match order_type {
            OrderType::Limit => 0,
            OrderType::Market => 1,
        }
    }
}

impl TryFrom<u8> for OrderType {
    type Error = OrderBookError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OrderType::Limit),
            1 => Ok(OrderType::Market),
            other => Err(OrderBookError::InvalidType(other)),
        }
    }
}

/// Client-facing order record
///
/// This is the shape orders are submitted in and the shape the registry
/// retains. The executed quantity is the aggregate matched so far; it
/// never decreases and never exceeds the original quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub price: Price,
    pub original_quantity: Quantity,
    pub executed_quantity: Quantity,
}

impl Order {
    /// Create a new limit order with no executions
    pub fn limit(id: impl Into<OrderId>, side: Side, price: Price, quantity: Quantity) -> Self {
        Self {
            id: id.into(),
            side,
            order_type: OrderType::Limit,
            price,
            original_quantity: quantity,
            executed_quantity: Quantity::ZERO,
        }
    }

    /// Create a new market order; market orders carry a zero price
    pub fn market(id: impl Into<OrderId>, side: Side, quantity: Quantity) -> Self {
        Self {
            id: id.into(),
            side,
            order_type: OrderType::Market,
            price: Price::ZERO,
            original_quantity: quantity,
            executed_quantity: Quantity::ZERO,
        }
    }

    /// Quantity still open (original minus executed)
    pub fn remaining_quantity(&self) -> Quantity {
        self.original_quantity.saturating_sub(self.executed_quantity)
    }

    /// Check if the order is completely executed
    pub fn is_filled(&self) -> bool {
        self.executed_quantity >= self.original_quantity
    }

    /// Check if the order has any executions
    pub fn has_fills(&self) -> bool {
        !self.executed_quantity.is_zero()
    }
}

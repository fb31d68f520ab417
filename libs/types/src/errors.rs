//! Error types for the order book engine
//!
//! A single flat taxonomy using thiserror. Every operation returns one of
//! these synchronously; there are no partial side effects on validation
//! failures. `MarketOrderNotFullyExecuted` is the one exception where the
//! partial execution is committed before the error is returned.

use crate::ids::OrderId;
use thiserror::Error;

/// Errors returned by order book operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderBookError {
    /// The order identifier is empty
    #[error("invalid order ID")]
    InvalidId,

    /// Original quantity is not strictly positive, or executed quantity
    /// was non-zero on entry
    #[error("invalid order quantity")]
    InvalidQuantity,

    /// The price could not be parsed or is negative
    #[error("invalid order price")]
    InvalidPrice,

    /// The wire value does not name a known side
    #[error("invalid order side: {0}")]
    InvalidSide(u8),

    /// The wire value does not name a known order type
    #[error("invalid order type: {0}")]
    InvalidType(u8),

    /// An order with this identifier already exists
    #[error("order {0} already exists")]
    OrderExists(OrderId),

    /// No order with this identifier is known
    #[error("order {0} does not exist")]
    OrderDoesNotExist(OrderId),

    /// A market order was submitted with a non-zero price
    #[error("market order has price set")]
    MarketOrderHasPrice,

    /// The book ran out of liquidity before the market order was filled;
    /// the executed fraction is committed, the residual is discarded
    #[error("market order not fully executed")]
    MarketOrderNotFullyExecuted,

    /// Market orders never rest and therefore cannot be canceled
    #[error("cannot cancel market order")]
    CannotCancelMarketOrder,

    /// The order is no longer resting on the book (already filled)
    #[error("order {0} is not eligible for cancelation")]
    CannotCancelOrder(OrderId),
}

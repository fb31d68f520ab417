//! Crossing detection logic
//!
//! Determines when an incoming limit order can match a resting price.

use types::numeric::Price;
use types::order::Side;

/// Check if an incoming order's limit price crosses a resting price
///
/// A buy crosses resting asks priced at or below its limit; a sell
/// crosses resting bids priced at or above its limit.
pub fn can_match(taker_side: Side, taker_price: Price, resting_price: Price) -> bool {
    match taker_side {
        Side::Buy => taker_price >= resting_price,
        Side::Sell => taker_price <= resting_price,
    }
}

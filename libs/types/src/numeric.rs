//! Fixed-point decimal types for prices and quantities
//!
//! Uses rust_decimal for deterministic arithmetic (no floating-point
//! errors). Values are normalized to at most eight fractional digits at
//! construction, so price equality is exact and a price can be keyed by
//! its scaled integer form.

use crate::errors::OrderBookError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Number of fractional digits carried by prices and quantities.
pub const DECIMAL_DP: u32 = 8;

/// Round to the supported precision and strip trailing zeros so that the
/// stored scale is minimal and never exceeds [`DECIMAL_DP`].
fn quantize(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(DECIMAL_DP, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Price type with fixed-point decimal representation
///
/// Non-negative; zero is legal and is what market orders carry.
/// Serialized as string to prevent JSON number precision loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// The zero price
    pub const ZERO: Price = Price(Decimal::ZERO);

    /// Create a new Price from a Decimal
    ///
    /// # Panics
    /// Panics if the price is negative
    pub fn new(value: Decimal) -> Self {
        assert!(value >= Decimal::ZERO, "Price must be non-negative");
        Self(quantize(value))
    }

    /// Try to create a Price, returning None if negative
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value >= Decimal::ZERO {
            Some(Self(quantize(value)))
        } else {
            None
        }
    }

    /// Create from integer (for testing/convenience)
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Get the inner decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// The price scaled by 10^8 as an integer
    ///
    /// Two prices are equal iff their raw forms are equal, which makes
    /// this suitable as an exact map key.
    pub fn raw(&self) -> i128 {
        // quantize() guarantees scale() <= DECIMAL_DP.
        self.0.mantissa() * 10i128.pow(DECIMAL_DP - self.0.scale())
    }

    /// Check if the price is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl FromStr for Price {
    type Err = OrderBookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s).map_err(|_| OrderBookError::InvalidPrice)?;
        Self::try_new(decimal).ok_or(OrderBookError::InvalidPrice)
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Quantity type with fixed-point decimal representation
///
/// Non-negative. A freshly submitted order must have a strictly positive
/// original quantity; that rule belongs to the engine's validation, while
/// intermediate remainders may legitimately reach zero.
/// Serialized as string to prevent JSON number precision loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Quantity(Decimal);

impl Quantity {
    /// The zero quantity
    pub const ZERO: Quantity = Quantity(Decimal::ZERO);

    /// Create a new Quantity from a Decimal
    ///
    /// # Panics
    /// Panics if the quantity is negative
    pub fn new(value: Decimal) -> Self {
        assert!(value >= Decimal::ZERO, "Quantity must be non-negative");
        Self(quantize(value))
    }

    /// Try to create a Quantity, returning None if negative
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value >= Decimal::ZERO {
            Some(Self(quantize(value)))
        } else {
            None
        }
    }

    /// Create from integer (for testing/convenience)
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Get the inner decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Check if the quantity is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the quantity is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Subtract, clamping at zero instead of going negative
    pub fn saturating_sub(self, rhs: Self) -> Self {
        if self.0 >= rhs.0 {
            Self(self.0 - rhs.0)
        } else {
            Self::ZERO
        }
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        assert!(
            self.0 >= rhs.0,
            "Quantity subtraction would result in negative"
        );
        Self(self.0 - rhs.0)
    }
}

impl FromStr for Quantity {
    type Err = OrderBookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s).map_err(|_| OrderBookError::InvalidQuantity)?;
        Self::try_new(decimal).ok_or(OrderBookError::InvalidQuantity)
    }
}

impl Serialize for Quantity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

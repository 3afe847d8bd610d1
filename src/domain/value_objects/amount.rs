//! # Fare Amounts
//!
//! Decimal fare amounts and the fixed fare buckets used by the amount
//! ranges report.
//!
//! The transaction source reports amounts either as JSON numbers or as
//! strings, and some records carry garbage. [`Amount::from_json`] accepts
//! both representations and rejects everything else so callers can skip the
//! record.
//!
//! # Examples
//!
//! ```
//! use delivery_reports::domain::value_objects::amount::{Amount, AmountRange};
//! use serde_json::json;
//!
//! let amount = Amount::from_json(&json!("-1.10")).unwrap();
//! assert_eq!(amount.abs().to_string(), "1.10");
//! assert_eq!(AmountRange::containing(amount.abs()).unwrap().label(), "1.00-1.25");
//! assert!(Amount::from_json(&json!("bad")).is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Decimal places used when reporting fares.
pub const FARE_DECIMAL_PLACES: u32 = 2;

/// A fare amount as reported by the transaction source.
///
/// Negative amounts occur for refunds; reports always work on
/// [`Amount::abs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates an amount from a decimal.
    #[inline]
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Parses an amount from its string form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if the string is not a decimal
    /// number.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_amount(raw));
        }
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Self)
            .map_err(|_| DomainError::invalid_amount(raw))
    }

    /// Parses an amount from a JSON value.
    ///
    /// Numbers and numeric strings are accepted; `null`, booleans, arrays,
    /// objects and non-numeric strings are rejected.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` for any unparseable value.
    pub fn from_json(value: &Value) -> DomainResult<Self> {
        match value {
            Value::Number(n) => Self::parse(&n.to_string()),
            Value::String(s) => Self::parse(s),
            other => Err(DomainError::invalid_amount(other.to_string())),
        }
    }

    /// Returns the absolute value of the amount.
    #[inline]
    #[must_use]
    pub fn abs(&self) -> Decimal {
        self.0.abs()
    }

    /// Returns the raw decimal value.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rounds a fare to [`FARE_DECIMAL_PLACES`], midpoint away from zero.
#[must_use]
pub fn round_fare(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(FARE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// One of the eight fixed fare buckets `[1.00, 1.25) … [2.75, 3.00)`.
///
/// Buckets are half-open and disjoint, so an amount falls in at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AmountRange {
    index: u8,
}

impl AmountRange {
    /// Number of buckets.
    pub const COUNT: usize = 8;

    /// Lower bound of the first bucket, in hundredths.
    const START_CENTS: i64 = 100;

    /// Bucket width, in hundredths.
    const WIDTH_CENTS: i64 = 25;

    /// Returns all buckets in ascending order.
    #[must_use]
    pub fn all() -> [AmountRange; Self::COUNT] {
        std::array::from_fn(|i| Self { index: i as u8 })
    }

    /// Returns the bucket containing `value`, or `None` when the value lies
    /// outside `[1.00, 3.00)`.
    #[must_use]
    pub fn containing(value: Decimal) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|range| range.lower() <= value && value < range.upper())
    }

    /// Returns the zero-based bucket index.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        usize::from(self.index)
    }

    /// Inclusive lower bound.
    #[must_use]
    pub fn lower(&self) -> Decimal {
        Decimal::new(
            Self::START_CENTS + Self::WIDTH_CENTS * i64::from(self.index),
            2,
        )
    }

    /// Exclusive upper bound.
    #[must_use]
    pub fn upper(&self) -> Decimal {
        Decimal::new(
            Self::START_CENTS + Self::WIDTH_CENTS * (i64::from(self.index) + 1),
            2,
        )
    }

    /// Column label, e.g. `1.00-1.25`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:.2}-{:.2}", self.lower(), self.upper())
    }
}

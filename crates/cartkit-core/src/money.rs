//! # Money Module
//!
//! Provides the `Money` type for monetary values and `RawAmount` for the
//! loosely-typed numbers callers and coupon sources hand us.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    4 × 0.35 = 1.4000000000000001  ❌ WRONG!                             │
//! │                                                                         │
//! │  OUR SOLUTION: Fixed-point decimal (rust_decimal)                       │
//! │    4 × 0.35 = 1.40 exactly                                              │
//! │    Unit prices keep whatever precision they were given                  │
//! │    Every derived amount is rounded to 2 places, half-up                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartkit_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let price: Money = "0.35".parse().unwrap();
//! let line = price.times(4).round_half_up();
//! assert_eq!(line.to_string(), "1.40");
//!
//! // Half-up, not bankers rounding: 0.005 → 0.01
//! let half = Money::new(Decimal::new(5, 3)).round_half_up();
//! assert_eq!(half.to_string(), "0.01");
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation::parse_amount;

/// Fractional digits kept on every derived monetary amount.
pub const MONEY_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value backed by an arbitrary-precision decimal.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  add_item("0.35") ──► LineItem.unit_price ──► LineItem.extended_price  │
/// │                                                      │                  │
/// │                                    Σ ──► Cart.subtotal                 │
/// │                                              │                          │
/// │                        coupon discount ──► Cart.total (floored at 0)   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// `Money` itself may hold any scale; only `round_half_up` pins it to two
/// fractional digits. Unit prices are stored unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Rounds to two decimal places, midpoint away from zero.
    ///
    /// ## Half-Up Rounding
    /// ```text
    /// 1.234  → 1.23
    /// 1.235  → 1.24   (midpoint rounds up, never to even)
    /// 0.005  → 0.01
    /// 90     → 90.00  (scale is always exactly 2)
    /// ```
    ///
    /// All amounts in cartkit are non-negative, so "away from zero" and
    /// "half-up" coincide.
    pub fn round_half_up(&self) -> Money {
        let mut rounded = self
            .0
            .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(MONEY_SCALE);
        Money(rounded)
    }

    /// Multiplies by a quantity, unrounded.
    ///
    /// ## Example
    /// ```rust
    /// use cartkit_core::money::Money;
    ///
    /// let unit_price: Money = "75.00".parse().unwrap();
    /// assert_eq!(unit_price.times(2).round_half_up().to_string(), "150.00");
    /// ```
    ///
    /// Panics if the product does not fit in a `Decimal`; use
    /// [`Money::checked_times`] for untrusted quantities.
    #[inline]
    pub fn times(&self, quantity: i64) -> Money {
        Money(self.0 * Decimal::from(quantity))
    }

    /// Multiplies by a quantity, or `None` if the product is not representable.
    ///
    /// ## Example
    /// ```rust
    /// use cartkit_core::money::Money;
    ///
    /// let price: Money = "100000000000".parse().unwrap();
    /// assert!(price.checked_times(1_000).is_some());
    /// assert!(price.checked_times(i64::MAX).is_none());
    /// ```
    #[inline]
    pub fn checked_times(&self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(Decimal::from(quantity)).map(Money)
    }

    /// Adds two amounts, or `None` if the sum is not representable.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Returns `percentage`% of this amount, unrounded.
    ///
    /// The percentage is used as given; clamping is the caller's policy.
    /// The rate is divided down first, so any percentage in `0..=100` keeps
    /// the result no larger than `self`.
    pub fn percent(&self, percentage: Decimal) -> Money {
        Money(self.0 * (percentage / Decimal::ONE_HUNDRED))
    }

    /// Returns this amount, or zero if it is negative.
    #[inline]
    pub fn floor_zero(self) -> Money {
        self.max(Money::zero())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount rounded half-up to exactly two places, without a currency
/// symbol. Presentation layers add their own prefix.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.round_half_up().0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

/// Parses a decimal literal. Negative values parse fine; whether they are
/// allowed is up to the field being validated.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_amount("amount", &RawAmount::from(s)).map(Money)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Raw Amount
// =============================================================================

/// A number as it arrived from a caller or a coupon source, before coercion.
///
/// Prices and coupon values may be given as decimals, integers, floats or
/// text. Nothing is trusted until [`RawAmount::to_decimal`] succeeds.
///
/// Deserializes untagged, so JSON `10`, `5.0` and `"5.00"` all work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Integer(i64),
    Float(f64),
    Text(String),
    Decimal(Decimal),
}

impl RawAmount {
    /// Coerces to an exact decimal, or `None` if the value is not a number.
    ///
    /// ## Coercion Rules
    /// - `Decimal`, `Integer`: exact
    /// - `Float`: through its shortest round-trip text, so `0.1` becomes
    ///   exactly `0.1` rather than its binary expansion; NaN and ∞ fail
    /// - `Text`: trimmed, plain or scientific notation
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            RawAmount::Decimal(value) => Some(*value),
            RawAmount::Integer(value) => Some(Decimal::from(*value)),
            RawAmount::Float(value) if value.is_finite() => {
                Decimal::from_str(&value.to_string()).ok()
            }
            RawAmount::Float(_) => None,
            RawAmount::Text(text) => {
                let text = text.trim();
                Decimal::from_str(text)
                    .or_else(|_| Decimal::from_scientific(text))
                    .ok()
            }
        }
    }
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawAmount::Decimal(value) => write!(f, "{value}"),
            RawAmount::Integer(value) => write!(f, "{value}"),
            RawAmount::Float(value) => write!(f, "{value}"),
            RawAmount::Text(text) => f.write_str(text),
        }
    }
}

impl From<Decimal> for RawAmount {
    fn from(value: Decimal) -> Self {
        RawAmount::Decimal(value)
    }
}

impl From<Money> for RawAmount {
    fn from(value: Money) -> Self {
        RawAmount::Decimal(value.amount())
    }
}

impl From<i64> for RawAmount {
    fn from(value: i64) -> Self {
        RawAmount::Integer(value)
    }
}

impl From<i32> for RawAmount {
    fn from(value: i32) -> Self {
        RawAmount::Integer(i64::from(value))
    }
}

impl From<u32> for RawAmount {
    fn from(value: u32) -> Self {
        RawAmount::Integer(i64::from(value))
    }
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        RawAmount::Float(value)
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(value: String) -> Self {
        RawAmount::Text(value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_half_up_midpoints() {
        assert_eq!(Money::new(dec!(0.005)).round_half_up().amount(), dec!(0.01));
        assert_eq!(Money::new(dec!(1.235)).round_half_up().amount(), dec!(1.24));
        assert_eq!(Money::new(dec!(1.245)).round_half_up().amount(), dec!(1.25));
        assert_eq!(Money::new(dec!(1.234)).round_half_up().amount(), dec!(1.23));
    }

    #[test]
    fn test_round_half_up_fixes_scale() {
        let rounded = Money::new(dec!(90)).round_half_up();
        assert_eq!(rounded.amount().scale(), 2);
        assert_eq!(rounded.to_string(), "90.00");
    }

    #[test]
    fn test_times_is_exact() {
        let price = Money::new(dec!(0.35));
        assert_eq!(price.times(4).round_half_up().amount(), dec!(1.40));
        assert_eq!(price.times(4).to_string(), "1.40");
    }

    #[test]
    fn test_percent() {
        let subtotal = Money::new(dec!(2575.00));
        assert_eq!(subtotal.percent(dec!(10)).amount(), dec!(257.50));
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::new(dec!(100000000000));
        assert_eq!(price.checked_times(3).unwrap().amount(), dec!(300000000000));
        assert!(price.checked_times(i64::MAX).is_none());

        let half = Money::new(dec!(50000000000000000000000000000));
        assert!(half.checked_add(half).is_none());
        assert_eq!(
            Money::new(dec!(1.25)).checked_add(Money::new(dec!(2.50))),
            Some(Money::new(dec!(3.75)))
        );
    }

    #[test]
    fn test_percent_of_largest_amount() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max.percent(dec!(100)).amount(), Decimal::MAX);
        assert!(max.percent(dec!(10)) < max);
    }

    #[test]
    fn test_floor_zero() {
        assert_eq!(Money::new(dec!(-2.00)).floor_zero(), Money::zero());
        assert_eq!(Money::new(dec!(2.00)).floor_zero().amount(), dec!(2.00));
    }

    #[test]
    fn test_sum_and_arithmetic() {
        let total: Money = [dec!(4.50), dec!(10.25)]
            .into_iter()
            .map(Money::new)
            .sum();
        assert_eq!(total.amount(), dec!(14.75));
        assert_eq!((total - Money::new(dec!(0.75))).amount(), dec!(14.00));
    }

    #[test]
    fn test_parse() {
        let money: Money = " 10.25 ".parse().unwrap();
        assert_eq!(money.amount(), dec!(10.25));
        assert!("abc".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
    }

    #[test]
    fn test_raw_amount_coercion() {
        assert_eq!(RawAmount::from(10).to_decimal(), Some(dec!(10)));
        assert_eq!(RawAmount::from(5.0).to_decimal(), Some(dec!(5)));
        assert_eq!(RawAmount::from(0.1).to_decimal(), Some(dec!(0.1)));
        assert_eq!(RawAmount::from("5.00").to_decimal(), Some(dec!(5.00)));
        assert_eq!(RawAmount::from("1e2").to_decimal(), Some(dec!(100)));
        assert_eq!(RawAmount::from("-3").to_decimal(), Some(dec!(-3)));
        assert_eq!(RawAmount::from("ten").to_decimal(), None);
        assert_eq!(RawAmount::from(f64::NAN).to_decimal(), None);
        assert_eq!(RawAmount::from(f64::INFINITY).to_decimal(), None);
    }

    #[test]
    fn test_raw_amount_deserializes_untagged() {
        let values: Vec<RawAmount> = serde_json::from_str(r#"[10, 5.5, "2.50"]"#).unwrap();
        assert_eq!(values[0], RawAmount::Integer(10));
        assert_eq!(values[1], RawAmount::Float(5.5));
        assert_eq!(values[2], RawAmount::Text("2.50".to_string()));
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::new(dec!(12.30))).unwrap();
        assert_eq!(json, r#""12.30""#);
    }
}

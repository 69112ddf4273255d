//! # Coupons
//!
//! Coupon descriptors, the `CouponLookup` capability a cart is built with,
//! and `CouponTable`, an in-memory lookup.
//!
//! ## Lookup Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart::apply_coupon("SAVE10")                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CouponLookup::lookup("SAVE10")   ← table, database, remote API...     │
//! │       │                                                                 │
//! │       ├── None                          → cart clears its coupon       │
//! │       │                                                                 │
//! │       └── Some({Percentage, RawAmount}) → cart coerces the value       │
//! │                 │                                                       │
//! │                 ├── not a number / < 0  → cart clears its coupon       │
//! │                 └── OK                  → replaces the applied coupon  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A lookup reports values in whatever form its source stores them. Negative
//! values are rejected on coercion and percentages are clamped when the
//! discount is computed, never by the lookup.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{Money, RawAmount};

// =============================================================================
// Descriptor
// =============================================================================

/// How a coupon's value is applied to the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponKind {
    /// `value` percent off the subtotal, capped at 100.
    Percentage,
    /// `value` currency units off the subtotal.
    Fixed,
}

impl fmt::Display for CouponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CouponKind::Percentage => f.write_str("percentage"),
            CouponKind::Fixed => f.write_str("fixed"),
        }
    }
}

/// A coupon's kind and value.
///
/// Lookups produce `CouponDescriptor<RawAmount>`; the cart stores the
/// coerced `CouponDescriptor<Decimal>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponDescriptor<V = Decimal> {
    pub kind: CouponKind,
    pub value: V,
}

impl CouponDescriptor<RawAmount> {
    /// A percentage-off coupon as a lookup would report it.
    pub fn percentage(value: impl Into<RawAmount>) -> Self {
        CouponDescriptor {
            kind: CouponKind::Percentage,
            value: value.into(),
        }
    }

    /// A fixed-amount coupon as a lookup would report it.
    pub fn fixed(value: impl Into<RawAmount>) -> Self {
        CouponDescriptor {
            kind: CouponKind::Fixed,
            value: value.into(),
        }
    }

    /// Coerces the value into a non-negative decimal.
    ///
    /// ## Example
    /// ```rust
    /// use cartkit_core::coupon::{CouponDescriptor, CouponRejection};
    ///
    /// assert!(CouponDescriptor::fixed(5.0).coerce().is_ok());
    /// assert_eq!(
    ///     CouponDescriptor::fixed(-1).coerce(),
    ///     Err(CouponRejection::Negative)
    /// );
    /// ```
    pub fn coerce(&self) -> Result<CouponDescriptor, CouponRejection> {
        let value = self
            .value
            .to_decimal()
            .ok_or(CouponRejection::NotANumber)?;

        if value < Decimal::ZERO {
            return Err(CouponRejection::Negative);
        }

        Ok(CouponDescriptor {
            kind: self.kind,
            value,
        })
    }
}

impl CouponDescriptor {
    /// The amount this coupon takes off `subtotal`, unrounded.
    ///
    /// Percentages are clamped to `[0, 100]` here, at computation time, so a
    /// stored value of 150 behaves as 100. The result may exceed the
    /// subtotal for fixed coupons; flooring the total is the cart's job.
    pub fn discount_on(&self, subtotal: Money) -> Money {
        match self.kind {
            CouponKind::Percentage => {
                let percentage = self.value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
                subtotal.percent(percentage)
            }
            CouponKind::Fixed => Money::new(self.value),
        }
    }
}

/// Why a descriptor returned by a lookup was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponRejection {
    /// The value could not be read as a decimal number.
    NotANumber,
    /// The value was below zero.
    Negative,
}

impl fmt::Display for CouponRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CouponRejection::NotANumber => f.write_str("coupon value is not a number"),
            CouponRejection::Negative => f.write_str("coupon value is negative"),
        }
    }
}

// =============================================================================
// Lookup Capability
// =============================================================================

/// Resolves coupon codes.
///
/// Must return `None` for any code it does not recognise. Calls are
/// synchronous; an implementation backed by a remote service owns its
/// timeout and retry policy and reports failure as `None`.
pub trait CouponLookup {
    fn lookup(&self, code: &str) -> Option<CouponDescriptor<RawAmount>>;
}

impl<T: CouponLookup + ?Sized> CouponLookup for &T {
    fn lookup(&self, code: &str) -> Option<CouponDescriptor<RawAmount>> {
        (**self).lookup(code)
    }
}

impl<T: CouponLookup + ?Sized> CouponLookup for Box<T> {
    fn lookup(&self, code: &str) -> Option<CouponDescriptor<RawAmount>> {
        (**self).lookup(code)
    }
}

impl<T: CouponLookup + ?Sized> CouponLookup for Rc<T> {
    fn lookup(&self, code: &str) -> Option<CouponDescriptor<RawAmount>> {
        (**self).lookup(code)
    }
}

impl<T: CouponLookup + ?Sized> CouponLookup for Arc<T> {
    fn lookup(&self, code: &str) -> Option<CouponDescriptor<RawAmount>> {
        (**self).lookup(code)
    }
}

// =============================================================================
// In-Memory Table
// =============================================================================

/// A fixed table of coupon codes.
///
/// A code can be registered without a coupon (`None`): it is known to the
/// table but resolves to nothing, exactly like an unknown code.
///
/// ## JSON Form
/// ```json
/// {
///   "SAVE10": { "kind": "percentage", "value": 10 },
///   "5OFF":   { "kind": "fixed", "value": 5.0 },
///   "INVALIDO": null
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouponTable {
    coupons: HashMap<String, Option<CouponDescriptor<RawAmount>>>,
}

impl CouponTable {
    /// Creates a table with no codes at all.
    pub fn empty() -> Self {
        CouponTable {
            coupons: HashMap::new(),
        }
    }

    /// Registers `code`, replacing any previous entry.
    pub fn insert(&mut self, code: impl Into<String>, coupon: CouponDescriptor<RawAmount>) {
        self.coupons.insert(code.into(), Some(coupon));
    }

    /// Registers `code` as known but resolving to no coupon.
    pub fn insert_unresolved(&mut self, code: impl Into<String>) {
        self.coupons.insert(code.into(), None);
    }

    /// Builder-style `insert`.
    pub fn with(mut self, code: impl Into<String>, coupon: CouponDescriptor<RawAmount>) -> Self {
        self.insert(code, coupon);
        self
    }

    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }

    /// Registered codes, sorted.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.coupons.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

/// The demo table: `SAVE10` (10%), `5OFF` (5.0 off) and `INVALIDO`, a
/// registered code with no coupon behind it.
impl Default for CouponTable {
    fn default() -> Self {
        let mut table = CouponTable::empty()
            .with("SAVE10", CouponDescriptor::percentage(10))
            .with("5OFF", CouponDescriptor::fixed(5.0));
        table.insert_unresolved("INVALIDO");
        table
    }
}

impl CouponLookup for CouponTable {
    fn lookup(&self, code: &str) -> Option<CouponDescriptor<RawAmount>> {
        self.coupons.get(code).cloned().flatten()
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
    fn test_default_table() {
        let table = CouponTable::default();

        assert_eq!(
            table.lookup("SAVE10"),
            Some(CouponDescriptor::percentage(10))
        );
        assert_eq!(table.lookup("5OFF"), Some(CouponDescriptor::fixed(5.0)));
        assert_eq!(table.lookup("INVALIDO"), None);
        assert_eq!(table.lookup("CUPOMINVALIDO123"), None);
        assert_eq!(table.codes(), vec!["5OFF", "INVALIDO", "SAVE10"]);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(CouponTable::default().lookup("save10"), None);
    }

    #[test]
    fn test_coerce() {
        let coupon = CouponDescriptor::fixed(5.0).coerce().unwrap();
        assert_eq!(coupon.kind, CouponKind::Fixed);
        assert_eq!(coupon.value, dec!(5));

        let coupon = CouponDescriptor::percentage("12.5").coerce().unwrap();
        assert_eq!(coupon.value, dec!(12.5));

        assert_eq!(
            CouponDescriptor::percentage("lots").coerce(),
            Err(CouponRejection::NotANumber)
        );
        assert_eq!(
            CouponDescriptor::fixed(-0.01).coerce(),
            Err(CouponRejection::Negative)
        );
    }

    #[test]
    fn test_coerce_keeps_percentage_above_100() {
        let coupon = CouponDescriptor::percentage(150).coerce().unwrap();
        assert_eq!(coupon.value, dec!(150));
    }

    #[test]
    fn test_discount_on() {
        let subtotal = Money::new(dec!(200.00));

        let ten_percent = CouponDescriptor {
            kind: CouponKind::Percentage,
            value: dec!(10),
        };
        assert_eq!(ten_percent.discount_on(subtotal).amount(), dec!(20.00));

        let capped = CouponDescriptor {
            kind: CouponKind::Percentage,
            value: dec!(150),
        };
        assert_eq!(capped.discount_on(subtotal), subtotal);

        let fixed = CouponDescriptor {
            kind: CouponKind::Fixed,
            value: dec!(250),
        };
        assert_eq!(fixed.discount_on(subtotal).amount(), dec!(250));
    }

    #[test]
    fn test_table_from_json() {
        let json = r#"{
            "HALF": { "kind": "percentage", "value": "50" },
            "TWO": { "kind": "fixed", "value": 2 },
            "DEAD": null
        }"#;
        let table: CouponTable = serde_json::from_str(json).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.lookup("HALF"), Some(CouponDescriptor::percentage("50")));
        assert_eq!(table.lookup("TWO"), Some(CouponDescriptor::fixed(2)));
        assert_eq!(table.lookup("DEAD"), None);
    }

    #[test]
    fn test_shared_lookups() {
        let table = Rc::new(CouponTable::default());
        let shared: Box<dyn CouponLookup> = Box::new(Rc::clone(&table));
        assert!(shared.lookup("SAVE10").is_some());

        let by_ref = &*table;
        assert!(by_ref.lookup("5OFF").is_some());
    }
}

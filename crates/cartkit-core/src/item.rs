//! # Line Items
//!
//! One priced product line in a cart.
//!
//! A `LineItem` has no public fields. Quantity and unit price change only
//! through `set_quantity`, `set_unit_price` and `update`, which re-run the
//! same checks as construction and leave the item untouched when they fail.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::money::{Money, RawAmount};
use crate::validation::{
    checked_extended_price, parse_unit_price, validate_item_name, validate_quantity,
    validate_stored_quantity,
};

/// A named product line: quantity × unit price.
///
/// ## Invariants
/// - `name` is non-blank after trimming
/// - `quantity >= 0` (0 only transiently, right before the cart drops it)
/// - `unit_price >= 0`, stored with the precision it was given
/// - `quantity × unit_price` fits in a `Decimal`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    name: String,
    quantity: i64,
    unit_price: Money,
}

impl LineItem {
    /// Creates a line item.
    ///
    /// ## Errors
    /// `InvalidArgument` if the name is blank, the quantity is not positive,
    /// the unit price is negative or not a number, or their product is too
    /// large to represent.
    ///
    /// ## Example
    /// ```rust
    /// use cartkit_core::LineItem;
    ///
    /// let item = LineItem::new("Banana", 4, "0.35").unwrap();
    /// assert_eq!(item.extended_price().to_string(), "1.40");
    ///
    /// assert!(LineItem::new("Banana", 0, "0.35").is_err());
    /// ```
    pub fn new(
        name: impl Into<String>,
        quantity: i64,
        unit_price: impl Into<RawAmount>,
    ) -> CoreResult<Self> {
        let name = name.into();
        validate_item_name(&name)?;
        validate_quantity(quantity)?;
        let unit_price = parse_unit_price(unit_price)?;
        checked_extended_price(unit_price, quantity)?;

        Ok(LineItem {
            name,
            quantity,
            unit_price,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Sets the quantity. Zero is accepted here, unlike in `new`.
    pub fn set_quantity(&mut self, quantity: i64) -> CoreResult<()> {
        validate_stored_quantity(quantity)?;
        checked_extended_price(self.unit_price, quantity)?;
        self.quantity = quantity;
        Ok(())
    }

    /// Replaces the unit price after validating it.
    pub fn set_unit_price(&mut self, unit_price: impl Into<RawAmount>) -> CoreResult<()> {
        let unit_price = parse_unit_price(unit_price)?;
        checked_extended_price(unit_price, self.quantity)?;
        self.unit_price = unit_price;
        Ok(())
    }

    /// Sets quantity and unit price together.
    ///
    /// Only the final pair has to be representable, so a top-up at a lower
    /// price can succeed where `set_quantity` alone would fail.
    pub fn update(&mut self, quantity: i64, unit_price: impl Into<RawAmount>) -> CoreResult<()> {
        validate_stored_quantity(quantity)?;
        let unit_price = parse_unit_price(unit_price)?;
        checked_extended_price(unit_price, quantity)?;

        self.quantity = quantity;
        self.unit_price = unit_price;
        Ok(())
    }

    /// quantity × unit price, rounded half-up to two places.
    ///
    /// Every constructor and setter has already checked this product, so it
    /// cannot overflow here.
    pub fn extended_price(&self) -> Money {
        self.unit_price.times(self.quantity).round_half_up()
    }

    /// Returns an owned, detached copy of this line for listings.
    pub fn snapshot(&self) -> LineItemSnapshot {
        LineItemSnapshot {
            name: self.name.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            extended_price: self.extended_price(),
        }
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x{} @ {}",
            self.name,
            self.quantity,
            self.unit_price.amount()
        )
    }
}

/// Read-only view of a line item, as returned by `Cart::list_items`.
///
/// Changing a snapshot never affects the cart it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemSnapshot {
    pub name: String,
    pub quantity: i64,
    /// Unit price as stored (unrounded).
    pub unit_price: Money,
    pub extended_price: Money,
}

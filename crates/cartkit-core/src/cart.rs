//! # Cart
//!
//! The shopping cart: line items keyed by name plus at most one coupon.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operation                     State Change                             │
//! │  ─────────                     ────────────                             │
//! │                                                                         │
//! │  add_item(name, qty, price) ─► new line, or qty += n and price = new   │
//! │                                                                         │
//! │  remove_item(name, None)    ─► line dropped                            │
//! │  remove_item(name, Some(n)) ─► qty -= n, dropped once n >= qty         │
//! │                                                                         │
//! │  apply_coupon(code)         ─► coupon replaced (or cleared on failure) │
//! │                                                                         │
//! │  clear()                    ─► no lines, no coupon                     │
//! │                                                                         │
//! │  total() / list_items()     ─► (read only)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! A cart is plain owned data and is not meant to be shared between
//! threads. Callers that need that serialize access themselves (one cart per
//! session, or a mutex around it). `Cart<L>` is `Send` whenever its lookup
//! `L` is, so `Cart<Arc<CouponTable>>` can move to another thread; the
//! default `Cart` (boxed `dyn CouponLookup`) cannot.
//!
//! ## Representable Totals
//! `add_item` refuses any change after which a line's extended price, the
//! subtotal or the total quantity would overflow. Every read (`subtotal`,
//! `total`, `summary`, `list_items`) is therefore infallible.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coupon::{CouponDescriptor, CouponKind, CouponLookup};
use crate::error::CoreResult;
use crate::item::{LineItem, LineItemSnapshot};
use crate::money::{Money, RawAmount};
use crate::validation::{
    checked_extended_price, checked_quantity_sum, checked_subtotal, checked_total_quantity,
    parse_unit_price, validate_item_name, validate_quantity, validate_removal_quantity,
};

/// The coupon currently applied to a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    /// Code the coupon was applied with.
    pub code: String,
    /// Descriptor with its value already coerced to a non-negative decimal.
    pub coupon: CouponDescriptor,
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by name (adding the same name again updates the line)
/// - Lines keep the order in which their name was first added
/// - At most one coupon is applied; every `apply_coupon` call replaces it
/// - Total quantity and subtotal always fit (see `add_item`)
///
/// `L` is the coupon lookup. It defaults to a boxed trait object so carts
/// with different lookups share one type; name a concrete `L` to keep
/// auto traits such as `Send`.
pub struct Cart<L = Box<dyn CouponLookup>> {
    items: Vec<LineItem>,
    applied_coupon: Option<AppliedCoupon>,
    coupon_lookup: Option<L>,
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart with no coupon lookup.
    ///
    /// `apply_coupon` on such a cart always returns `false` and changes
    /// nothing.
    pub fn new() -> Self {
        Self::from_parts(None)
    }
}

impl<L: CouponLookup> Cart<L> {
    fn from_parts(coupon_lookup: Option<L>) -> Self {
        Cart {
            items: Vec::new(),
            applied_coupon: None,
            coupon_lookup,
            created_at: Utc::now(),
        }
    }

    /// Creates a new empty cart that resolves coupons through `lookup`.
    ///
    /// ## Example
    /// ```rust
    /// use cartkit_core::{Cart, CouponTable};
    ///
    /// let mut cart = Cart::with_lookup(CouponTable::default());
    /// cart.add_item("Produto A", 1, "100.00").unwrap();
    ///
    /// assert!(cart.apply_coupon("SAVE10"));
    /// assert_eq!(cart.total().to_string(), "90.00");
    /// ```
    pub fn with_lookup(lookup: L) -> Self {
        Self::from_parts(Some(lookup))
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Adds a line or tops up an existing one.
    ///
    /// ## Behavior
    /// - Name not in cart: a new line is appended
    /// - Name already in cart: quantity is increased by `quantity` and the
    ///   unit price is **overwritten** with `unit_price` (last price wins)
    ///
    /// ## Errors
    /// `InvalidArgument` for an unparseable or negative price, a
    /// non-positive quantity, or a blank name. `OutOfRange` if the line's
    /// extended price, the cart subtotal or the cart's total quantity would
    /// no longer be representable. The cart is unchanged.
    pub fn add_item(
        &mut self,
        name: &str,
        quantity: i64,
        unit_price: impl Into<RawAmount>,
    ) -> CoreResult<()> {
        let unit_price = parse_unit_price(unit_price)?;
        validate_quantity(quantity)?;
        validate_item_name(name)?;

        let existing = self.items.iter().position(|i| i.name() == name);
        let new_quantity = match existing {
            Some(index) => checked_quantity_sum(self.items[index].quantity(), quantity)?,
            None => quantity,
        };
        self.check_line_fits(existing, new_quantity, unit_price)?;

        match existing {
            Some(index) => {
                self.items[index].update(new_quantity, unit_price)?;
                debug!(name = %name, quantity = new_quantity, unit_price = %unit_price.amount(), "Updated cart item");
            }
            None => {
                self.items.push(LineItem::new(name, quantity, unit_price)?);
                debug!(name = %name, quantity, unit_price = %unit_price.amount(), "Added cart item");
            }
        }
        Ok(())
    }

    /// Checks that the cart stays representable with the line at `replacing`
    /// (or a new line, if `None`) set to `quantity` × `unit_price`.
    fn check_line_fits(
        &self,
        replacing: Option<usize>,
        quantity: i64,
        unit_price: Money,
    ) -> CoreResult<()> {
        let mut total_quantity = quantity;
        let mut subtotal = checked_extended_price(unit_price, quantity)?;

        for (index, item) in self.items.iter().enumerate() {
            if Some(index) == replacing {
                continue;
            }
            total_quantity = checked_total_quantity(total_quantity, item.quantity())?;
            subtotal = checked_subtotal(subtotal, item.extended_price())?;
        }

        Ok(())
    }

    /// Removes a line entirely, or part of its quantity.
    ///
    /// ## Behavior
    /// - Name not in cart: no-op, `Ok(())`
    /// - `None`, or `Some(n)` with `n >= quantity`: the line is removed
    /// - `Some(n)` with `0 < n < quantity`: quantity is decreased by `n`
    ///
    /// ## Errors
    /// `InvalidArgument` if `Some(n)` with `n <= 0`. The cart is unchanged.
    pub fn remove_item(&mut self, name: &str, quantity_to_remove: Option<i64>) -> CoreResult<()> {
        let Some(index) = self.items.iter().position(|i| i.name() == name) else {
            debug!(name = %name, "Remove ignored, item not in cart");
            return Ok(());
        };

        if let Some(quantity) = quantity_to_remove {
            validate_removal_quantity(quantity)?;
        }

        let current = self.items[index].quantity();
        match quantity_to_remove {
            Some(quantity) if quantity < current => {
                self.items[index].set_quantity(current - quantity)?;
                debug!(name = %name, removed = quantity, remaining = current - quantity, "Decreased cart item");
            }
            _ => {
                self.items.remove(index);
                debug!(name = %name, "Removed cart item");
            }
        }

        Ok(())
    }

    /// Returns the line for `name`, if present.
    pub fn item(&self, name: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.name() == name)
    }

    /// Detached snapshots of every line, in first-added order.
    pub fn list_items(&self) -> Vec<LineItemSnapshot> {
        self.items.iter().map(LineItem::snapshot).collect()
    }

    /// Removes all lines and the applied coupon.
    pub fn clear(&mut self) {
        self.items.clear();
        self.applied_coupon = None;
        self.created_at = Utc::now();
        debug!("Cleared cart");
    }

    /// Returns the number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(LineItem::quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// When the cart was created or last cleared.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // =========================================================================
    // Coupons
    // =========================================================================

    /// Resolves `code` and makes it the applied coupon.
    ///
    /// ## Coupon Resolution
    /// ```text
    /// no lookup bound ─────────────────────────► false, state untouched
    /// lookup → None ───────────────────────────► false, coupon cleared
    /// lookup → value not a number, or < 0 ─────► false, coupon cleared
    /// lookup → valid ──────────────────────────► true,  coupon replaced
    /// ```
    ///
    /// There is no stacking and no "keep the better one": whatever this call
    /// decides supersedes the previous coupon.
    pub fn apply_coupon(&mut self, code: &str) -> bool {
        let Some(lookup) = self.coupon_lookup.as_ref() else {
            debug!(code = %code, "No coupon lookup configured");
            return false;
        };

        let Some(descriptor) = lookup.lookup(code) else {
            debug!(code = %code, "Coupon not found");
            self.applied_coupon = None;
            return false;
        };

        match descriptor.coerce() {
            Ok(coupon) => {
                debug!(code = %code, kind = %coupon.kind, value = %coupon.value, "Applied coupon");
                self.applied_coupon = Some(AppliedCoupon {
                    code: code.to_string(),
                    coupon,
                });
                true
            }
            Err(reason) => {
                debug!(code = %code, value = %descriptor.value, reason = %reason, "Rejected coupon");
                self.applied_coupon = None;
                false
            }
        }
    }

    /// The applied coupon descriptor, if any.
    pub fn applied_coupon(&self) -> Option<&CouponDescriptor> {
        self.applied_coupon.as_ref().map(|applied| &applied.coupon)
    }

    /// Code of the applied coupon, if any.
    pub fn applied_coupon_code(&self) -> Option<&str> {
        self.applied_coupon
            .as_ref()
            .map(|applied| applied.code.as_str())
    }

    // =========================================================================
    // Totals
    // =========================================================================

    /// Sum of all extended prices, rounded half-up to two places.
    pub fn subtotal(&self) -> Money {
        self.items
            .iter()
            .map(LineItem::extended_price)
            .sum::<Money>()
            .round_half_up()
    }

    /// Final amount due.
    ///
    /// ## Calculation
    /// ```text
    /// subtotal  = Σ extended_price                     (2dp, half-up)
    /// discount  = subtotal × min(max(pct, 0), 100) / 100   (percentage)
    ///           = value                                     (fixed)
    /// total     = max(0, subtotal − discount)          (2dp, half-up)
    /// ```
    pub fn total(&self) -> Money {
        let subtotal = self.subtotal();

        let Some(applied) = self.applied_coupon.as_ref() else {
            return subtotal;
        };

        let discount = applied.coupon.discount_on(subtotal);
        (subtotal - discount).floor_zero().round_half_up()
    }

    /// How much the applied coupon actually takes off (`subtotal − total`).
    ///
    /// Never more than the subtotal: a fixed coupon larger than the cart
    /// only discounts the cart down to zero.
    pub fn discount(&self) -> Money {
        self.subtotal() - self.total()
    }

    /// Totals snapshot for display or serialization.
    pub fn summary(&self) -> CartSummary {
        CartSummary::from(self)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> fmt::Debug for Cart<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart")
            .field("items", &self.items)
            .field("applied_coupon", &self.applied_coupon)
            .field("has_coupon_lookup", &self.coupon_lookup.is_some())
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Cart totals summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub coupon: Option<AppliedCoupon>,
}

impl CartSummary {
    /// Percentage or fixed, if a coupon is applied.
    pub fn coupon_kind(&self) -> Option<CouponKind> {
        self.coupon.as_ref().map(|applied| applied.coupon.kind)
    }

    /// Stored coupon value, before any percentage clamp.
    pub fn coupon_value(&self) -> Option<Decimal> {
        self.coupon.as_ref().map(|applied| applied.coupon.value)
    }
}

impl<L: CouponLookup> From<&Cart<L>> for CartSummary {
    fn from(cart: &Cart<L>) -> Self {
        CartSummary {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
            discount: cart.discount(),
            total: cart.total(),
            coupon: cart.applied_coupon.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

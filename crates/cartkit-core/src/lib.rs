//! # cartkit-core: Pure Cart Logic for cartkit
//!
//! This crate is the **heart** of cartkit. It contains the monetary and
//! coupon logic as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        cartkit Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    cartkit-cli (apps/)                          │   │
//! │  │    config ──► tracing ──► script runner ──► listing / totals    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ cartkit-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   item    │  │   cart    │  │  coupon   │  │   │
//! │  │   │   Money   │  │ LineItem  │  │   Cart    │  │  Lookup   │  │   │
//! │  │   │ RawAmount │  │ Snapshot  │  │  Summary  │  │  Table    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO GLOBAL STATE          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Decimal-backed `Money` and loosely-typed `RawAmount` input
//! - [`item`] - `LineItem`, one priced product line
//! - [`cart`] - `Cart`, items keyed by name plus one optional coupon
//! - [`coupon`] - Coupon descriptors and the `CouponLookup` capability
//! - [`validation`] - Input rules shared by items and the cart
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Exact Money**: every amount is a `rust_decimal::Decimal`, never a float
//! 2. **Half-Up Rounding**: derived amounts are rounded to 2 places, 0.005 → 0.01
//! 3. **Validate, Then Mutate**: a failed call leaves the cart as it was
//! 4. **Injected Lookup**: the cart never knows where coupons come from
//!
//! ## Example Usage
//!
//! ```rust
//! use cartkit_core::{Cart, CouponTable};
//!
//! let mut cart = Cart::with_lookup(CouponTable::default());
//! cart.add_item("Laptop", 1, "2500.00")?;
//! cart.add_item("Mouse", 2, "75.00")?;
//! assert_eq!(cart.subtotal().to_string(), "2650.00");
//!
//! assert!(cart.apply_coupon("SAVE10"));
//! assert_eq!(cart.total().to_string(), "2385.00");
//!
//! cart.remove_item("Mouse", Some(1))?;
//! assert_eq!(cart.total().to_string(), "2317.50");
//! # Ok::<(), cartkit_core::CoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod coupon;
pub mod error;
pub mod item;
pub mod money;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use cartkit_core::Cart` instead of
// `use cartkit_core::cart::Cart`

pub use cart::{AppliedCoupon, Cart, CartSummary};
pub use coupon::{CouponDescriptor, CouponKind, CouponLookup, CouponTable};
pub use error::{CoreError, CoreResult, ValidationError};
pub use item::{LineItem, LineItemSnapshot};
pub use money::{Money, RawAmount};

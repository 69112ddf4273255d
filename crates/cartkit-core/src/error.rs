//! # Error Types
//!
//! Domain-specific error types for cartkit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cartkit-core errors (this file)                                       │
//! │  ├── CoreError        - What cart and line item operations return      │
//! │  └── ValidationError  - Which input was rejected, and why              │
//! │                                                                         │
//! │  cartkit-cli errors (app)                                              │
//! │  └── ConfigError      - Bad environment values                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError::InvalidArgument → anyhow (CLI)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Coupon resolution never produces an error: an unknown code or an
//! unusable coupon value is reported by `Cart::apply_coupon` returning `false`.

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by cart and line item operations.
///
/// Every failure is a local validation failure: nothing is retryable and
/// nothing is fatal. The operation that failed has not mutated any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Malformed or illegal input to an item or cart operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),
}

impl CoreError {
    /// Returns the underlying validation failure.
    pub fn validation(&self) -> &ValidationError {
        match self {
            CoreError::InvalidArgument(err) => err,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Each variant carries the name of the offending field so callers can tell
/// a bad quantity from a bad removal quantity without parsing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing, empty, or only whitespace.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Numeric value does not fit the allowed range. Quantities are bounded
    /// by `i64`, amounts by what a `Decimal` can hold.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: Decimal,
        max: Decimal,
    },

    /// Value could not be parsed (e.g. a price of "abc").
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Name of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::MustBePositive { field }
            | ValidationError::MustNotBeNegative { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

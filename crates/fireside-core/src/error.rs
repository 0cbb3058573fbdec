//! # Error Types
//!
//! Domain-specific error types for fireside-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fireside-core errors (this file)                                      │
//! │  ├── CoreError        - Domain errors (unknown item, empty cart)       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  fireside-db          - DbError, CatalogError                          │
//! │  fireside-payments    - PaymentError                                   │
//! │  fireside-desk        - ApiError (what the presentation layer sees)    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → presentation layer     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Menu item id is not present in the catalog.
    ///
    /// ## When This Occurs
    /// - The item was removed by a catalog edit while it sat in a cart view
    /// - A stale id was replayed from an old order
    #[error("Menu item not found: {0}")]
    ItemNotFound(String),

    /// An order was submitted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Cart line index does not exist.
    #[error("Cart line {0} does not exist")]
    LineNotFound(usize),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised for rejected catalog edits, negative adjustments and charges with
/// nothing to collect.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Amount is above the ceiling for that field, or too large to compute.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: Money },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., non-numeric tax rate).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two menu items sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Structured text could not be parsed.
    #[error("Malformed {what}: {reason}")]
    Malformed { what: String, reason: String },
}

impl ValidationError {
    /// Shorthand for a [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Shorthand for a [`ValidationError::TooLarge`].
    pub fn too_large(field: impl Into<String>, max: Money) -> Self {
        ValidationError::TooLarge {
            field: field.into(),
            max,
        }
    }

    /// Shorthand for a [`ValidationError::MustNotBeNegative`].
    pub fn negative(field: impl Into<String>) -> Self {
        ValidationError::MustNotBeNegative {
            field: field.into(),
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

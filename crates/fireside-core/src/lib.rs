//! # fireside-core: Pure Business Logic for Fireside POS
//!
//! Everything here is deterministic and free of I/O. The database, the
//! catalog file and the payment provider live in other crates and call in.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Fireside POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │           Presentation layer (front desk / kitchen / manager)   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  fireside-desk commands                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ fireside-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │  pricing  │  │   money   │  │   types   │  │   │
//! │  │   │ MenuItem  │  │line_total │  │   Money   │  │   Order   │  │   │
//! │  │   │ Size/Top. │  │order_tot. │  │  TaxRate  │  │ OrderItem │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           fireside-db / fireside-payments                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Menu catalog model, parsing and the default menu
//! - [`pricing`] - Line totals and order totals
//! - [`money`] - Money type with integer arithmetic
//! - [`types`] - Order, order item, customer and status types
//! - [`error`] - Domain error types
//! - [`validation`] - Input rules shared by the command layer
//!
//! ## Example Usage
//!
//! ```rust
//! use fireside_core::money::Money;
//! use fireside_core::pricing::order_totals;
//! use fireside_core::types::TaxRate;
//!
//! let totals = order_totals(
//!     Money::from_cents(3500),
//!     TaxRate::from_bps(850),
//!     Money::from_cents(500),
//!     Money::from_cents(300),
//!     Money::from_cents(400),
//! )
//! .unwrap();
//! assert_eq!(totals.tax.cents(), 255);
//! assert_eq!(totals.total.cents(), 3955);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, Category, MenuItem, Size, Topping};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use pricing::{line_total, order_totals, price_line, Totals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Name printed on checkout labels and reports.
pub const APP_NAME: &str = "Fireside Pizza POS";

/// Default sales tax: 8.5%.
pub const DEFAULT_TAX_RATE_BPS: u32 = 850;

/// Default delivery fee in cents ($3.00).
pub const DEFAULT_DELIVERY_FEE_CENTS: i64 = 300;

/// Maximum lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single cart line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_LINE_QUANTITY: i64 = 999;

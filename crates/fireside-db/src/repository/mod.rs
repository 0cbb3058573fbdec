//! # Repository Module
//!
//! Database repositories for Fireside POS.
//!
//! ```text
//! desk command / webhook handler
//!      │
//!      │  db.orders().set_paid(42, true)
//!      ▼
//! OrderRepository ──► SQL ──► SQLite
//! ```
//!
//! Queries are built at runtime with `sqlx::query` and decoded through
//! private `FromRow` structs, then converted into `fireside-core` types.
//! Money columns carry a `_cents` suffix and map to [`fireside_core::Money`].
//!
//! - [`OrderRepository`](order::OrderRepository) - orders, order items, kitchen and manager queries
//! - [`CustomerRepository`](customer::CustomerRepository) - customer lookups

pub mod customer;
pub mod order;

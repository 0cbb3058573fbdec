//! # fireside-db: Database Layer for Fireside POS
//!
//! SQLite storage for customers, orders and order items, plus the JSON
//! catalog file the front desk edits.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fireside POS Data Flow                           │
//! │                                                                         │
//! │  fireside-desk command            fireside-webhook handler              │
//! │  (place_order, advance_order)     (checkout.session.completed)          │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   fireside-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │   Repositories     │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│  OrderRepository   │  │ (embedded) │  │   │
//! │  │   │               │    │  CustomerRepository│  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐                                             │   │
//! │  │   │ CatalogStore  │  menu.json: seed, read, validated save      │   │
//! │  │   └───────────────┘                                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  fireside.db (shared by both processes)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fireside_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("fireside.db")).await?;
//! let order_id = db.orders().create_order(&new_order, &items).await?;
//! db.orders().set_paid(order_id, true).await?;
//! ```

pub mod catalog;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

pub use catalog::CatalogStore;
pub use error::{CatalogError, CatalogResult, DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::customer::CustomerRepository;
pub use repository::order::{KitchenTicket, OrderRepository};

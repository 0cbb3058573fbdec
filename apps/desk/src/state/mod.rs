//! # State Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────────────────┐   │
//! │  │  AppContext          │        │  SessionContext (one per desk)   │   │
//! │  │  (shared, &self)     │        │  (owned by the caller, &mut)     │   │
//! │  │                      │        │                                  │   │
//! │  │  • Database          │        │  • Cart                          │   │
//! │  │  • CatalogStore      │        │  • tax rate                      │   │
//! │  │  • dyn PaymentGateway│        │  • delivery fee                  │   │
//! │  │  • DeskConfig        │        │                                  │   │
//! │  └──────────────────────┘        └──────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod cart;
mod config;
mod session;

pub use app::AppContext;
pub use cart::{Cart, CartSummary};
pub use config::DeskConfig;
pub use session::SessionContext;

#[cfg(test)]
pub(crate) use app::testing;

//! # Desk Commands
//!
//! Everything the presentation layer calls.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── cart.rs     ◄─── Cart lines for the session
//! ├── order.rs    ◄─── Place order, preview totals
//! ├── payment.rs  ◄─── Card checkout, return-URL confirmation
//! ├── kitchen.rs  ◄─── Kitchen queue, advance, void
//! ├── manager.rs  ◄─── History, overrides, daily summary
//! └── catalog.rs  ◄─── Menu and catalog editor
//! ```
//!
//! ## Calling Convention
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  async fn add_to_cart(                                                  │
//! │      ctx: &AppContext,               ◄── shared: db, catalog, gateway  │
//! │      session: &mut SessionContext,   ◄── this desk's cart + settings   │
//! │      request: AddToCart,             ◄── from the UI                   │
//! │  ) -> Result<CartSummary, ApiError>  ◄── serialized back to the UI     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Commands that need no session (kitchen, manager, catalog) take only the
//! context.

pub mod cart;
pub mod catalog;
pub mod kitchen;
pub mod manager;
pub mod order;
pub mod payment;

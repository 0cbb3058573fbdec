//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌──────────┐     ┌──────────┐     ┌──────────────┐     ┌──────────┐
//! │  Empty   │────►│ In Cart  │────►│ place_order  │────►│  Empty   │
//! │  Cart    │     │          │     │ (order.rs)   │     │  Cart    │
//! └──────────┘     └──────────┘     └──────────────┘     └──────────┘
//!                    │  add_to_cart
//!                    │  increment_line / decrement_line
//!                    │  remove_line
//!                    ▼
//!                  clear_cart ─────────────────────────────► (empty)
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{AppContext, CartSummary, SessionContext};
use fireside_core::CartLine;

/// One "add item" action from the order entry screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddToCart {
    pub item_id: String,
    pub qty: i64,
    pub size: Option<String>,
    #[serde(default)]
    pub toppings: Vec<String>,
    pub notes: Option<String>,
}

/// Adds a line priced from the current catalog.
///
/// Unknown size or topping names price at zero delta; an unknown item id
/// is `NOT_FOUND`.
pub async fn add_to_cart(
    ctx: &AppContext,
    session: &mut SessionContext,
    request: AddToCart,
) -> Result<CartSummary, ApiError> {
    debug!(item_id = %request.item_id, qty = request.qty, "add_to_cart command");

    let catalog = ctx.catalog.load().await?;
    let item = catalog.find_item(&request.item_id)?;
    let line = CartLine::from_menu_item(
        item,
        request.qty,
        request.size.as_deref(),
        &request.toppings,
        request.notes,
    )?;

    session.cart.add_line(line)?;
    Ok(CartSummary::from(&session.cart))
}

pub fn increment_line(session: &mut SessionContext, index: usize) -> Result<CartSummary, ApiError> {
    session.cart.increment(index)?;
    Ok(CartSummary::from(&session.cart))
}

/// Decreases a line's quantity; stops at 1.
pub fn decrement_line(session: &mut SessionContext, index: usize) -> Result<CartSummary, ApiError> {
    session.cart.decrement(index)?;
    Ok(CartSummary::from(&session.cart))
}

pub fn remove_line(session: &mut SessionContext, index: usize) -> Result<CartSummary, ApiError> {
    session.cart.remove(index)?;
    Ok(CartSummary::from(&session.cart))
}

pub fn clear_cart(session: &mut SessionContext) -> CartSummary {
    debug!("clear_cart command");
    session.cart.clear();
    CartSummary::from(&session.cart)
}

pub fn cart_summary(session: &SessionContext) -> CartSummary {
    CartSummary::from(&session.cart)
}

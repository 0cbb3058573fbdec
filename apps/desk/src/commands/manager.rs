//! # Manager Commands
//!
//! Order history, manual overrides and the daily numbers.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Manager action           Command             Store call                │
//! │  ──────────────           ───────             ──────────                │
//! │  Filter history ────────► list_orders() ────► orders.list(filter)      │
//! │  Paid / Unpaid toggle ──► set_paid() ───────► orders.set_paid()        │
//! │  Archive / Restore ─────► set_archived() ───► orders.set_archived()    │
//! │  Force complete ────────► mark_completed() ─► orders.update_status()   │
//! │  Today at a glance ─────► daily_summary() ──► orders.daily_summary()   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Overrides take an explicit target and return the order as stored.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppContext;
use fireside_core::{DailySummary, Order, OrderFilter, OrderId, OrderStatus};

pub async fn list_orders(ctx: &AppContext, filter: OrderFilter) -> Result<Vec<Order>, ApiError> {
    debug!(?filter, "list_orders command");
    Ok(ctx.db.orders().list(&filter).await?)
}

/// Manual paid override, e.g. for cash taken at the counter.
pub async fn set_paid(ctx: &AppContext, order_id: OrderId, paid: bool) -> Result<Order, ApiError> {
    let orders = ctx.db.orders();
    if orders.set_paid(order_id, paid).await? {
        info!(order_id, paid, "Paid flag set by manager");
    }
    Ok(orders.require(order_id).await?)
}

pub async fn set_archived(
    ctx: &AppContext,
    order_id: OrderId,
    archived: bool,
) -> Result<Order, ApiError> {
    let orders = ctx.db.orders();
    orders.set_archived(order_id, archived).await?;
    info!(order_id, archived, "Archived flag set by manager");
    Ok(orders.require(order_id).await?)
}

/// Jumps an order straight to Completed.
pub async fn mark_completed(ctx: &AppContext, order_id: OrderId) -> Result<Order, ApiError> {
    let orders = ctx.db.orders();
    orders.update_status(order_id, OrderStatus::Completed).await?;
    info!(order_id, "Order completed by manager");
    Ok(orders.require(order_id).await?)
}

/// Count, gross and average ticket for `date` (UTC), today when `None`.
pub async fn daily_summary(
    ctx: &AppContext,
    date: Option<NaiveDate>,
) -> Result<DailySummary, ApiError> {
    let day = date.unwrap_or_else(|| Utc::now().date_naive());
    Ok(ctx.db.orders().daily_summary(day).await?)
}

//! # Kitchen Commands
//!
//! ## Ticket Flow
//! ```text
//! ┌─────────┐  advance  ┌─────────────┐  advance  ┌─────────┐  advance  ┌───────────┐
//! │   New   │──────────►│ In Progress │──────────►│  Ready  │──────────►│ Completed │
//! └─────────┘           └─────────────┘           └─────────┘           └───────────┘
//!      ▲                                                                 (off screen)
//!      └── place_order
//! ```
//! The store accepts any status; only the forward step is offered here.

use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppContext;
use fireside_core::{Order, OrderId};
use fireside_db::KitchenTicket;

/// Tickets still in the kitchen, newest first, without voided items.
pub async fn kitchen_queue(ctx: &AppContext) -> Result<Vec<KitchenTicket>, ApiError> {
    Ok(ctx.db.orders().kitchen_queue().await?)
}

/// Moves an order one step forward.
pub async fn advance_order(ctx: &AppContext, order_id: OrderId) -> Result<Order, ApiError> {
    let orders = ctx.db.orders();
    let order = orders.require(order_id).await?;

    let next = order.status.next().ok_or_else(|| {
        ApiError::validation(format!("Order #{} is already {}", order_id, order.status.label()))
    })?;

    orders.update_status(order_id, next).await?;
    info!(order_id, from = %order.status, to = %next, "Order advanced");

    Ok(orders.require(order_id).await?)
}

/// Marks a line item voided. It stays on the order for reporting.
pub async fn void_item(ctx: &AppContext, item_id: i64) -> Result<(), ApiError> {
    debug!(item_id, "void_item command");
    ctx.db.orders().void_item(item_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::testing;
    use fireside_core::{Money, NewOrder, NewOrderItem, OrderStatus, ServiceType, Totals};

    async fn ticket(ctx: &AppContext, items: &[&str]) -> OrderId {
        let order = NewOrder {
            customer_name: Some("Kitchen Test".into()),
            customer_phone: None,
            service_type: ServiceType::DineIn,
            table_number: Some("4".into()),
            payment_method: None,
            notes: None,
            source: "POS".into(),
            totals: Totals::default(),
        };
        let items: Vec<NewOrderItem> = items
            .iter()
            .map(|name| NewOrderItem {
                item_id: name.to_lowercase(),
                item_name: name.to_string(),
                base_price: Money::from_cents(500),
                size: None,
                size_delta: Money::zero(),
                modifiers: Vec::new(),
                qty: 1,
                line_total: Money::from_cents(500),
                notes: None,
            })
            .collect();
        ctx.db.orders().create_order(&order, &items).await.unwrap()
    }

    #[tokio::test]
    async fn test_advance_through_lifecycle() {
        let (ctx, _, _dir) = testing::context().await;
        let id = ticket(&ctx, &["Knots"]).await;

        assert_eq!(advance_order(&ctx, id).await.unwrap().status, OrderStatus::InProgress);
        assert_eq!(advance_order(&ctx, id).await.unwrap().status, OrderStatus::Ready);
        assert_eq!(kitchen_queue(&ctx).await.unwrap().len(), 1);

        assert_eq!(advance_order(&ctx, id).await.unwrap().status, OrderStatus::Completed);
        assert!(kitchen_queue(&ctx).await.unwrap().is_empty());

        let err = advance_order(&ctx, id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(ctx.db.orders().require(id).await.unwrap().status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_void_item_hides_from_queue() {
        let (ctx, _, _dir) = testing::context().await;
        let id = ticket(&ctx, &["Knots", "Soda"]).await;

        let items = ctx.db.orders().get_items(id).await.unwrap();
        void_item(&ctx, items[0].id).await.unwrap();

        let queue = kitchen_queue(&ctx).await.unwrap();
        assert_eq!(queue[0].items.len(), 1);
        assert_eq!(ctx.db.orders().get_items(id).await.unwrap().len(), 2);

        assert_eq!(void_item(&ctx, 9999).await.unwrap_err().code, ErrorCode::NotFound);
        assert_eq!(advance_order(&ctx, 9999).await.unwrap_err().code, ErrorCode::NotFound);
    }
}

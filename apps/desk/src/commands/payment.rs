//! # Payment Commands
//!
//! Card checkout for placed orders and the return-URL half of
//! reconciliation. The webhook half runs in its own process.
//!
//! ```text
//! place_order ─┐
//!              ├──► begin_checkout ──► gateway.create_checkout
//! start_checkout┘                          │
//!                                          ▼
//!                           orders.record_checkout_session(id, cs_...)
//!
//! browser returns ──► confirm_return(query) ──► Reconciler ──► Notice
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppContext;
use fireside_core::{Order, OrderId};
use fireside_payments::{CheckoutRequest, CheckoutSession, ReconcileOutcome, ReturnParams, ReturnUrlCheck};

/// Creates a checkout for a committed order and records its session id.
///
/// Once the provider has created the session its URL is returned even if
/// recording the id fails; both reconciliation paths find the order
/// through the session metadata.
pub(crate) async fn begin_checkout(ctx: &AppContext, order: &Order) -> Result<CheckoutSession, ApiError> {
    let request = CheckoutRequest::for_order(order);
    let session = ctx.gateway.create_checkout(&request).await?;

    if let Err(e) = ctx
        .db
        .orders()
        .record_checkout_session(order.id, &session.session_id)
        .await
    {
        warn!(
            order_id = order.id,
            session_id = %session.session_id,
            error = %e,
            "Checkout started but its session id was not recorded"
        );
    } else {
        info!(order_id = order.id, session_id = %session.session_id, "Checkout started");
    }
    Ok(session)
}

/// Starts (or restarts) card checkout for an unpaid order.
pub async fn start_checkout(ctx: &AppContext, order_id: OrderId) -> Result<CheckoutSession, ApiError> {
    debug!(order_id, "start_checkout command");

    let order = ctx.db.orders().require(order_id).await?;
    if order.paid {
        return Err(ApiError::validation(format!("Order #{} is already paid", order_id)));
    }
    begin_checkout(ctx, &order).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
}

/// Banner shown after the customer comes back from checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub outcome: ReconcileOutcome,
}

impl From<ReconcileOutcome> for Notice {
    fn from(outcome: ReconcileOutcome) -> Self {
        let (level, message) = match &outcome {
            ReconcileOutcome::MarkedPaid { order_id } => (
                NoticeLevel::Success,
                format!("Payment confirmed. Order #{} marked paid.", order_id),
            ),
            ReconcileOutcome::AlreadyPaid { order_id } => {
                (NoticeLevel::Success, format!("Order #{} is already paid.", order_id))
            }
            ReconcileOutcome::NotPaid { status, .. } => (
                NoticeLevel::Warning,
                format!("Returned from checkout. Payment status: {}.", status),
            ),
            ReconcileOutcome::Canceled { order_id } => (
                NoticeLevel::Warning,
                format!("Checkout canceled for order #{}.", order_id),
            ),
            ReconcileOutcome::UnknownOrder { order_id } => (
                NoticeLevel::Warning,
                format!("Payment confirmed, but order #{} does not exist.", order_id),
            ),
            ReconcileOutcome::Ignored { reason } => {
                (NoticeLevel::Info, format!("Returned from checkout ({}).", reason))
            }
        };
        Notice {
            level,
            message,
            outcome,
        }
    }
}

/// Handles the query string the desk was opened with.
///
/// `None` when the request is not a checkout return. Gateway lookups that
/// fail are reported as errors and change nothing.
pub async fn confirm_return(ctx: &AppContext, query: &str) -> Result<Option<Notice>, ApiError> {
    let params = ReturnParams::from_query(query);
    if !params.is_checkout_return() {
        return Ok(None);
    }
    debug!(?params, "confirm_return command");

    let check = ReturnUrlCheck::new(params, ctx.gateway.as_ref());
    let outcome = ctx.reconciler().reconcile(&check).await?;
    Ok(Some(Notice::from(outcome)))
}

//! # Payment Reconciliation
//!
//! Two triggers report a payment confirmation; one reconciler applies it.
//!
//! ```text
//! ┌─────────────────────┐        ┌──────────────────────┐
//! │ ReturnUrlCheck      │        │ VerifiedEvent        │
//! │ (desk, on redirect) │        │ (webhook receiver)   │
//! │ asks the gateway    │        │ signed by provider   │
//! └─────────┬───────────┘        └──────────┬───────────┘
//!           │   confirmation() -> Confirmation
//!           └──────────────┬─────────────────┘
//!                          ▼
//!                    Reconciler::reconcile
//!                          │ Paid
//!                          ▼
//!           OrderRepository::set_paid(id, true)
//! ```
//!
//! `set_paid(id, true)` is a single conditional UPDATE to a constant, so
//! both triggers may fire in any order, any number of times, from separate
//! processes. The first one marks the order; the rest see `AlreadyPaid`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::PaymentResult;
use crate::gateway::{PaymentGateway, PaymentStatus};
use crate::return_url::{CheckoutOutcome, ReturnParams};
use crate::webhook::{construct_event, WebhookEvent};
use fireside_core::OrderId;
use fireside_db::OrderRepository;

/// What a trigger learned about a payment. Order ids are still raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Paid { order_id: String },
    NotPaid { order_id: String, status: PaymentStatus },
    Canceled { order_id: String },
    Ignored { reason: String },
}

/// A source of payment confirmations.
#[async_trait]
pub trait ReconciliationTrigger: Send + Sync {
    /// Short name for logs.
    fn source(&self) -> &'static str;

    async fn confirmation(&self) -> PaymentResult<Confirmation>;
}

// =============================================================================
// Return-URL Path
// =============================================================================

/// Confirmation from the customer's redirect back to the desk.
///
/// The redirect itself proves nothing; the session is looked up at the
/// gateway and must belong to the order named in the query.
pub struct ReturnUrlCheck<'a> {
    params: ReturnParams,
    gateway: &'a dyn PaymentGateway,
}

impl<'a> ReturnUrlCheck<'a> {
    pub fn new(params: ReturnParams, gateway: &'a dyn PaymentGateway) -> Self {
        ReturnUrlCheck { params, gateway }
    }
}

#[async_trait]
impl ReconciliationTrigger for ReturnUrlCheck<'_> {
    fn source(&self) -> &'static str {
        "return_url"
    }

    async fn confirmation(&self) -> PaymentResult<Confirmation> {
        let params = &self.params;
        let Some(outcome) = params.checkout else {
            return Ok(ignored("no checkout indicator"));
        };
        let Some(order_id) = params.order_id.clone() else {
            return Ok(ignored("return request has no order_id"));
        };

        if outcome == CheckoutOutcome::Canceled {
            return Ok(Confirmation::Canceled { order_id });
        }

        let Some(session_id) = params.session_id.as_deref() else {
            return Ok(ignored("return request has no session_id"));
        };

        let session = self.gateway.retrieve_status(session_id).await?;
        if let Some(owner) = session.order_id.as_deref() {
            if owner != order_id {
                return Ok(ignored(format!(
                    "session {} belongs to order {}, not {}",
                    session_id, owner, order_id
                )));
            }
        }

        if session.status.is_paid() {
            Ok(Confirmation::Paid { order_id })
        } else {
            Ok(Confirmation::NotPaid {
                order_id,
                status: session.status,
            })
        }
    }
}

// =============================================================================
// Webhook Path
// =============================================================================

/// A provider event whose signature has been checked.
///
/// Only obtainable through [`VerifiedEvent::from_request`].
#[derive(Debug, Clone)]
pub struct VerifiedEvent {
    event: WebhookEvent,
}

impl VerifiedEvent {
    pub fn from_request(
        payload: &[u8],
        signature: Option<&str>,
        secret: &str,
        now: DateTime<Utc>,
    ) -> PaymentResult<Self> {
        let event = construct_event(payload, signature, secret, now)?;
        Ok(VerifiedEvent { event })
    }

    pub fn event(&self) -> &WebhookEvent {
        &self.event
    }
}

#[async_trait]
impl ReconciliationTrigger for VerifiedEvent {
    fn source(&self) -> &'static str {
        "webhook"
    }

    async fn confirmation(&self) -> PaymentResult<Confirmation> {
        if !self.event.is_payment_event() {
            return Ok(ignored(format!("event type {} not handled", self.event.event_type)));
        }
        match self.event.metadata_order_id() {
            Some(order_id) => Ok(Confirmation::Paid { order_id }),
            None => Ok(ignored(format!("event {} has no order_id metadata", self.event.id))),
        }
    }
}

fn ignored(reason: impl Into<String>) -> Confirmation {
    Confirmation::Ignored {
        reason: reason.into(),
    }
}

// =============================================================================
// Reconciler
// =============================================================================

/// What reconciliation did to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    MarkedPaid { order_id: OrderId },
    AlreadyPaid { order_id: OrderId },
    NotPaid { order_id: String, status: PaymentStatus },
    Canceled { order_id: String },
    UnknownOrder { order_id: OrderId },
    Ignored { reason: String },
}

impl ReconcileOutcome {
    /// The order is paid after this reconciliation.
    pub fn is_paid(&self) -> bool {
        matches!(
            self,
            ReconcileOutcome::MarkedPaid { .. } | ReconcileOutcome::AlreadyPaid { .. }
        )
    }
}

/// Applies confirmations to the order store.
#[derive(Debug, Clone)]
pub struct Reconciler {
    orders: OrderRepository,
}

impl Reconciler {
    pub fn new(orders: OrderRepository) -> Self {
        Reconciler { orders }
    }

    /// Runs `trigger` and applies its confirmation.
    ///
    /// Gateway and storage failures propagate; the caller decides whether
    /// they reach the user (return path) or are acknowledged (webhook).
    pub async fn reconcile(&self, trigger: &dyn ReconciliationTrigger) -> PaymentResult<ReconcileOutcome> {
        let source = trigger.source();

        let outcome = match trigger.confirmation().await? {
            Confirmation::Paid { order_id: raw } => match raw.parse::<OrderId>() {
                Ok(order_id) => self.mark_paid(source, order_id).await?,
                Err(_) => {
                    debug!(source, order_id = %raw, "Skipping non-numeric order id");
                    ReconcileOutcome::Ignored {
                        reason: format!("order id {} is not a local order", raw),
                    }
                }
            },
            Confirmation::NotPaid { order_id, status } => {
                warn!(source, order_id = %order_id, status = %status, "Checkout returned but payment not confirmed");
                ReconcileOutcome::NotPaid { order_id, status }
            }
            Confirmation::Canceled { order_id } => {
                warn!(source, order_id = %order_id, "Checkout canceled");
                ReconcileOutcome::Canceled { order_id }
            }
            Confirmation::Ignored { reason } => {
                debug!(source, reason = %reason, "Nothing to reconcile");
                ReconcileOutcome::Ignored { reason }
            }
        };

        Ok(outcome)
    }

    async fn mark_paid(&self, source: &str, order_id: OrderId) -> PaymentResult<ReconcileOutcome> {
        match self.orders.set_paid(order_id, true).await {
            Ok(true) => {
                info!(source, order_id, "Payment confirmed, order marked paid");
                Ok(ReconcileOutcome::MarkedPaid { order_id })
            }
            Ok(false) => {
                debug!(source, order_id, "Payment confirmed again, order already paid");
                Ok(ReconcileOutcome::AlreadyPaid { order_id })
            }
            Err(e) if e.is_not_found() => {
                warn!(source, order_id, "Payment confirmed for unknown order");
                Ok(ReconcileOutcome::UnknownOrder { order_id })
            }
            Err(e) => Err(e.into()),
        }
    }
}

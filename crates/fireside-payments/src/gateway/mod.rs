//! # Payment Gateway
//!
//! The seam between order handling and the card payment provider.
//!
//! ```text
//! place_order / start_checkout          ReturnUrlCheck
//!          │                                  │
//!          ▼                                  ▼
//!   create_checkout(req)             retrieve_status(session_id)
//!          │                                  │
//!          └──────────► dyn PaymentGateway ◄──┘
//!                          │
//!              ┌───────────┴────────────┐
//!              ▼                        ▼
//!        StripeGateway             MockGateway
//!        (REST, reqwest)           (tests, records calls)
//! ```
//!
//! A gateway never writes to the order store. Recording the session id and
//! flipping `paid` are the caller's business.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{PaymentError, PaymentResult};
use fireside_core::validation::validate_charge_amount;
use fireside_core::{Money, Order, OrderId};

#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod stripe;

/// What to charge, for which order, under which label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub order_id: OrderId,
    /// Whole order total in minor units.
    pub amount: Money,
    /// Product name on the provider's checkout page.
    pub label: String,
}

impl CheckoutRequest {
    pub fn new(order_id: OrderId, amount: Money, label: impl Into<String>) -> Self {
        CheckoutRequest {
            order_id,
            amount,
            label: label.into(),
        }
    }

    /// Charges the frozen total of a placed order.
    pub fn for_order(order: &Order) -> Self {
        CheckoutRequest::new(order.id, order.totals.total, order.checkout_label())
    }

    /// Rejects zero and negative amounts before anything is sent.
    pub fn validate(&self) -> PaymentResult<()> {
        validate_charge_amount(self.amount).map_err(|_| PaymentError::NothingToCharge(self.amount))
    }
}

/// A created provider checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Hosted payment page to send the customer to.
    pub url: String,
    pub session_id: String,
}

/// Payment state of a checkout session as the provider reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    /// Anything else the provider may answer (`no_payment_required`, ...).
    Other(String),
}

impl PaymentStatus {
    pub fn from_provider(value: &str) -> Self {
        match value {
            "paid" => PaymentStatus::Paid,
            "unpaid" => PaymentStatus::Unpaid,
            other => PaymentStatus::Other(other.to_string()),
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Unpaid => write!(f, "unpaid"),
            PaymentStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Result of a session lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: String,
    pub status: PaymentStatus,
    /// `metadata.order_id` exactly as stored on the session.
    pub order_id: Option<String>,
}

/// Card payment provider.
///
/// ## Contract
/// - `create_checkout`: `PaymentError::NotConfigured` without credentials,
///   `PaymentError::NothingToCharge` for amounts ≤ 0 (no request is made),
///   otherwise one provider call. The session carries the order id as
///   metadata.
/// - `retrieve_status`: read-only lookup.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout(&self, request: &CheckoutRequest) -> PaymentResult<CheckoutSession>;

    async fn retrieve_status(&self, session_id: &str) -> PaymentResult<SessionStatus>;
}

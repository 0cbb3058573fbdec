//! # fireside-payments: Card Checkout for Fireside POS
//!
//! Creates provider checkouts for placed orders and folds payment
//! confirmations back into the order store.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  desk: place_order ──► Order Store (committed, unpaid)                  │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  PaymentGateway::create_checkout ──► hosted payment page                │
//! │                                          │                              │
//! │                    ┌─────────────────────┴──────────────────┐           │
//! │                    ▼                                        ▼           │
//! │   browser redirect (?checkout=success...)      provider webhook POST    │
//! │                    │                                        │           │
//! │             ReturnUrlCheck                           VerifiedEvent      │
//! │                    └──────────► Reconciler ◄────────────────┘           │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                        OrderRepository::set_paid(id, true)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Provider credentials and public base URL, validated lazily
//! - [`error`] - Payment error types
//! - [`gateway`] - `PaymentGateway` trait, Stripe adapter, test mock
//! - [`return_url`] - Success/cancel URL building and parsing
//! - [`webhook`] - Signature verification and event parsing
//! - [`reconcile`] - Reconciliation triggers and the reconciler

pub mod config;
pub mod error;
pub mod gateway;
pub mod reconcile;
pub mod return_url;
pub mod webhook;

pub use config::PaymentConfig;
pub use error::{PaymentError, PaymentResult};
pub use gateway::stripe::StripeGateway;
pub use gateway::{CheckoutRequest, CheckoutSession, PaymentGateway, PaymentStatus, SessionStatus};
pub use reconcile::{Confirmation, ReconcileOutcome, Reconciler, ReconciliationTrigger, ReturnUrlCheck, VerifiedEvent};
pub use return_url::{CheckoutOutcome, ReturnParams, ReturnUrls};
pub use webhook::WebhookEvent;

#[cfg(any(test, feature = "test-util"))]
pub use gateway::mock::MockGateway;

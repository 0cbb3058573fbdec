//! # Fireside Webhook Receiver
//!
//! Accepts signed payment events from the provider and marks the matching
//! orders paid in the store the desk reads from.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Webhook Receiver                                 │
//! │                                                                         │
//! │  Provider ───► POST /webhook ───► VerifiedEvent ───► Reconciler        │
//! │                POST /stripe/webhook                       │             │
//! │                                                           ▼             │
//! │  Monitor  ───► GET /health ─────────────────────────► SQLite (WAL)     │
//! │                                                      shared with desk   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (a `.env` file is honoured):
//! - `WEBHOOK_BIND` - Listen address, default `0.0.0.0:8000`
//! - `FIRESIDE_DB_PATH` - SQLite file shared with the desk
//! - `STRIPE_WEBHOOK_SECRET` - Signing secret from the provider dashboard

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use fireside_db::Database;
use fireside_payments::{PaymentConfig, Reconciler};

/// Default log directives when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,fireside=debug,sqlx=warn";

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub payments: Arc<PaymentConfig>,
}

impl AppState {
    pub fn new(db: Database, payments: PaymentConfig) -> Self {
        AppState {
            db,
            payments: Arc::new(payments),
        }
    }

    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.db.orders())
    }
}

/// Builds the HTTP routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(routes::handle_webhook))
        .route("/stripe/webhook", post(routes::handle_webhook))
        .route("/health", get(routes::health))
        .with_state(state)
}

/// Installs the global tracing subscriber. A second call is a no-op.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

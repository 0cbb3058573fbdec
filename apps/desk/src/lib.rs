//! # Fireside Desk Library
//!
//! Command layer behind the front desk, kitchen display and manager view.
//! A presentation front end opens an [`AppContext`](state::AppContext) once,
//! keeps one [`SessionContext`](state::SessionContext) per desk and calls the
//! functions under [`commands`].
//!
//! ## Module Organization
//! ```text
//! fireside_desk/
//! ├── lib.rs          ◄─── You are here (startup & logging)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── app.rs      ◄─── Shared handles: db, catalog, gateway
//! │   ├── session.rs  ◄─── Per-desk cart and settings
//! │   ├── cart.rs     ◄─── Cart lines and limits
//! │   └── config.rs   ◄─── desk.toml + environment
//! ├── commands/       ◄─── cart, order, payment, kitchen, manager, catalog
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. .env (dotenvy), if present                                          │
//! │  2. init_tracing(): RUST_LOG or "info,fireside=debug,sqlx=warn"         │
//! │  3. DeskConfig::load(): defaults ► desk.toml ► FIRESIDE_* / STRIPE_*    │
//! │  4. AppContext::open(): SQLite (WAL, migrations), catalog seed, Stripe  │
//! │  5. On launch URL: commands::payment::confirm_return(query)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use state::{AppContext, DeskConfig};

/// Default log directives when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,fireside=debug,sqlx=warn";

/// Installs the global tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=fireside_payments=trace` - Trace one crate only
///
/// Calling it again (e.g. from a second front end window) is a no-op.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Err only means a subscriber is already installed.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Loads `.env`, starts logging, reads the configuration and opens the
/// application context.
pub async fn start(config_path: Option<PathBuf>) -> Result<AppContext, ApiError> {
    let dotenv = dotenvy::dotenv().ok();
    init_tracing();

    if let Some(path) = dotenv {
        info!(?path, "Loaded environment file");
    }

    let config = DeskConfig::load(config_path)?;
    info!(store = %config.store_name, "Starting Fireside desk");

    AppContext::open(config).await
}

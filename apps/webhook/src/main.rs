//! # Fireside Webhook
//!
//! Binary entry point: config, store, HTTP server, graceful shutdown.

use tokio::net::TcpListener;
use tracing::{error, info};

use fireside_db::{Database, DbConfig};
use fireside_webhook::config::WebhookConfig;
use fireside_webhook::{init_tracing, router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv().ok();
    init_tracing();

    info!("Starting Fireside webhook receiver...");
    if let Some(path) = dotenv {
        info!(?path, "Loaded environment file");
    }

    let config = WebhookConfig::load()?;
    info!(
        bind = %config.bind_addr,
        db_path = %config.database_path.display(),
        payments = ?config.payments,
        "Configuration loaded"
    );
    if config.payments.require_webhook_secret().is_err() {
        error!("STRIPE_WEBHOOK_SECRET is not set; deliveries will be answered with 500");
    }

    // Connect to database (migrations run on connect)
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Connected to order store");

    let state = AppState::new(db.clone(), config.payments);
    let app = router(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Listening for webhook deliveries");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}

//! # Application Context
//!
//! Long-lived handles shared by every session: the order store, the catalog
//! file and the payment gateway.
//!
//! ## Thread Safety
//! `Database` wraps a `SqlitePool`, `CatalogStore` is a path, and the gateway
//! is `Send + Sync` behind an `Arc`. Commands take `&AppContext` and run
//! concurrently without extra locking.

use std::sync::Arc;

use tracing::info;

use super::DeskConfig;
use crate::error::ApiError;
use fireside_db::{CatalogStore, Database, DbConfig};
use fireside_payments::{PaymentGateway, Reconciler, StripeGateway};

pub struct AppContext {
    pub db: Database,
    pub catalog: CatalogStore,
    pub gateway: Arc<dyn PaymentGateway>,
    pub config: DeskConfig,
}

impl AppContext {
    pub fn new(
        db: Database,
        catalog: CatalogStore,
        gateway: Arc<dyn PaymentGateway>,
        config: DeskConfig,
    ) -> Self {
        AppContext {
            db,
            catalog,
            gateway,
            config,
        }
    }

    /// Opens the database, seeds the catalog if missing and sets up the
    /// Stripe gateway.
    ///
    /// Missing payment credentials do not fail here; card checkout reports
    /// them when attempted.
    pub async fn open(config: DeskConfig) -> Result<Self, ApiError> {
        let db_path = config.database_path()?;
        info!(?db_path, "Opening order store");
        let db = Database::new(DbConfig::new(db_path)).await?;

        let catalog = CatalogStore::new(config.catalog_path()?);
        if catalog.ensure_seeded().await? {
            info!(path = ?catalog.path(), "Seeded default catalog");
        }

        let gateway = StripeGateway::new(config.payments.clone())?;
        if !config.payments.is_configured() {
            info!("Card payments not configured; checkout will be unavailable");
        }

        Ok(AppContext::new(db, catalog, Arc::new(gateway), config))
    }

    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.db.orders())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use fireside_payments::MockGateway;
    use tempfile::TempDir;

    /// In-memory store, temp catalog and a mock gateway.
    pub async fn context() -> (AppContext, Arc<MockGateway>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = CatalogStore::new(dir.path().join("menu.json"));
        catalog.ensure_seeded().await.unwrap();
        let gateway = Arc::new(MockGateway::new());
        let ctx = AppContext::new(db, catalog, gateway.clone(), DeskConfig::default());
        (ctx, gateway, dir)
    }
}

//! # Database Migrations
//!
//! Embedded SQL migrations for Fireside POS.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Startup (desk, webhook receiver, or seed)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Compare embedded migrations vs _sqlx_migrations                        │
//! │       │                                                                 │
//! │       ├── 001_initial_schema.sql     ✓ customers, orders, order_items   │
//! │       └── 002_checkout_sessions.sql  ⬜ nullable checkout columns       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Run pending migrations in order, record each one                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create `migrations/sqlite/NNN_description.sql` with the next number
//! 2. Only add: new tables, or new columns that are nullable or defaulted
//! 3. **NEVER** modify an existing migration; stores persist across upgrades
//!
//! Both processes run the migrator on startup. The second one to start finds
//! nothing pending.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Migrations embedded from `migrations/sqlite` at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// Idempotent; each migration runs in its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(embedded, applied)` migration counts for diagnostics.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    // table is missing on a fresh file that was opened with run_migrations(false)
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_all_migrations_applied() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (total, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(applied, total);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.run_migrations().await.unwrap();
        let (_, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(applied, 2);
    }

    #[tokio::test]
    async fn test_status_without_migrations() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        let (total, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(applied, 0);
    }
}

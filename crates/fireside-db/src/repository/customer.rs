//! # Customer Repository
//!
//! Read side of the customer aggregate. Writes happen inside
//! [`OrderRepository::create_order`](super::order::OrderRepository::create_order)
//! so the aggregate and the order commit together.

use sqlx::SqlitePool;

use crate::error::DbResult;
use fireside_core::{Customer, Money};

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    name: Option<String>,
    phone: String,
    total_spent_cents: i64,
    orders_count: i64,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            phone: row.phone,
            total_spent: Money::from_cents(row.total_spent_cents),
            orders_count: row.orders_count,
        }
    }
}

/// Repository for customer lookups.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by exact phone number.
    pub async fn get_by_phone(&self, phone: &str) -> DbResult<Option<Customer>> {
        let row: Option<CustomerRow> = sqlx::query_as(
            "SELECT id, name, phone, total_spent_cents, orders_count FROM customers WHERE phone = ?1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_get_by_phone_missing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.customers().get_by_phone("555-0000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_phone_is_unique() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("INSERT INTO customers (name, phone) VALUES ('Ana', '555-0101')")
            .execute(db.pool())
            .await
            .unwrap();
        let err = sqlx::query("INSERT INTO customers (name, phone) VALUES ('Ann', '555-0101')")
            .execute(db.pool())
            .await
            .map_err(crate::DbError::from)
            .unwrap_err();
        assert!(matches!(err, crate::DbError::UniqueViolation { .. }));
    }
}

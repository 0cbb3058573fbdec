//! # Order Repository
//!
//! Orders, their line items, and the queries behind the kitchen display and
//! the manager view.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. CREATE (one transaction)                                            │
//! │     └── upsert customer by phone (+total, +1 order)                     │
//! │     └── insert order header with frozen totals                          │
//! │     └── insert every line item                                          │
//! │     └── commit, or nothing at all                                       │
//! │                                                                         │
//! │  2. CHECKOUT                                                            │
//! │     └── record_checkout_session() after the provider answers           │
//! │                                                                         │
//! │  3. PAYMENT (return URL, webhook, or manager)                           │
//! │     └── set_paid(true): first call flips + stamps paid_at, rest no-op   │
//! │                                                                         │
//! │  4. KITCHEN                                                             │
//! │     └── update_status(): New → InProgress → Ready → Completed          │
//! │     └── void_item(): line stays, flagged voided                         │
//! │                                                                         │
//! │  5. ARCHIVE                                                             │
//! │     └── set_archived(true): hidden from kitchen and daily summary       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Single-field updates are one `UPDATE` statement each, so two processes
//! flipping `paid` on the same row cannot lose an update.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use fireside_core::{
    DailySummary, Modifier, Money, NewOrder, NewOrderItem, Order, OrderFilter, OrderId,
    OrderItem, OrderStatus, ServiceType, Totals,
};

const ORDER_COLUMNS: &str = "id, created_at, customer_name, customer_phone, service_type, \
     table_number, status, paid, payment_method, notes, source, \
     subtotal_cents, tax_cents, discount_cents, delivery_fee_cents, tip_cents, total_cents, \
     archived, checkout_session_id, paid_at";

const ITEM_COLUMNS: &str = "id, order_id, item_id, item_name, base_price_cents, size, \
     size_delta_cents, modifiers, qty, line_total_cents, item_notes, voided";

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    created_at: DateTime<Utc>,
    customer_name: Option<String>,
    customer_phone: Option<String>,
    service_type: ServiceType,
    table_number: Option<String>,
    status: OrderStatus,
    paid: bool,
    payment_method: Option<String>,
    notes: Option<String>,
    source: String,
    subtotal_cents: i64,
    tax_cents: i64,
    discount_cents: i64,
    delivery_fee_cents: i64,
    tip_cents: i64,
    total_cents: i64,
    archived: bool,
    checkout_session_id: Option<String>,
    paid_at: Option<DateTime<Utc>>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            created_at: row.created_at,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            service_type: row.service_type,
            table_number: row.table_number,
            status: row.status,
            paid: row.paid,
            payment_method: row.payment_method,
            notes: row.notes,
            source: row.source,
            totals: Totals {
                subtotal: Money::from_cents(row.subtotal_cents),
                tax: Money::from_cents(row.tax_cents),
                discount: Money::from_cents(row.discount_cents),
                delivery_fee: Money::from_cents(row.delivery_fee_cents),
                tip: Money::from_cents(row.tip_cents),
                total: Money::from_cents(row.total_cents),
            },
            archived: row.archived,
            checkout_session_id: row.checkout_session_id,
            paid_at: row.paid_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    item_id: String,
    item_name: String,
    base_price_cents: i64,
    size: Option<String>,
    size_delta_cents: i64,
    modifiers: String,
    qty: i64,
    line_total_cents: i64,
    item_notes: Option<String>,
    voided: bool,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = DbError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        let modifiers: Vec<Modifier> =
            serde_json::from_str(&row.modifiers).map_err(|e| DbError::CorruptRow {
                entity: "order item".to_string(),
                id: row.id.to_string(),
                column: "modifiers".to_string(),
                reason: e.to_string(),
            })?;

        Ok(OrderItem {
            id: row.id,
            order_id: row.order_id,
            item_id: row.item_id,
            item_name: row.item_name,
            base_price: Money::from_cents(row.base_price_cents),
            size: row.size,
            size_delta: Money::from_cents(row.size_delta_cents),
            modifiers,
            qty: row.qty,
            line_total: Money::from_cents(row.line_total_cents),
            notes: row.item_notes,
            voided: row.voided,
        })
    }
}

/// An order on the kitchen display with its live (non-voided) items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenTicket {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Fixed-width UTC timestamp so text comparison orders like time.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn day_start(day: NaiveDate) -> String {
    timestamp(day.and_time(NaiveTime::default()).and_utc())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists an order, its line items and the customer aggregate.
    ///
    /// ## Atomicity
    /// Everything runs in one transaction. A failing item insert (for
    /// example a `qty` of 0 hitting the CHECK constraint) rolls back the
    /// order header and the customer update as well.
    ///
    /// ## Customer Aggregate
    /// With a phone number, the customer row is created or updated here and
    /// only here: `total_spent += totals.total`, `orders_count += 1`.
    /// Payment confirmation never touches it again.
    pub async fn create_order(&self, order: &NewOrder, items: &[NewOrderItem]) -> DbResult<OrderId> {
        self.create_order_at(order, items, Utc::now()).await
    }

    /// [`create_order`](Self::create_order) with an explicit creation time.
    pub async fn create_order_at(
        &self,
        order: &NewOrder,
        items: &[NewOrderItem],
        created_at: DateTime<Utc>,
    ) -> DbResult<OrderId> {
        let mut tx = self.pool.begin().await?;

        if let Some(phone) = order.customer_phone.as_deref() {
            debug!(phone = %phone, "Upserting customer");
            sqlx::query(
                r#"
                INSERT INTO customers (name, phone, total_spent_cents, orders_count)
                VALUES (?1, ?2, ?3, 1)
                ON CONFLICT (phone) DO UPDATE SET
                    name = COALESCE(excluded.name, customers.name),
                    total_spent_cents = customers.total_spent_cents + excluded.total_spent_cents,
                    orders_count = customers.orders_count + 1
                "#,
            )
            .bind(&order.customer_name)
            .bind(phone)
            .bind(order.totals.total.cents())
            .execute(&mut *tx)
            .await?;
        }

        let totals = &order.totals;
        let order_id = sqlx::query(
            r#"
            INSERT INTO orders (
                created_at, customer_name, customer_phone, service_type, table_number,
                status, paid, payment_method, notes, source,
                subtotal_cents, tax_cents, discount_cents, delivery_fee_cents, tip_cents, total_cents,
                archived
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, 0, ?7, ?8, ?9,
                ?10, ?11, ?12, ?13, ?14, ?15,
                0
            )
            "#,
        )
        .bind(timestamp(created_at))
        .bind(&order.customer_name)
        .bind(&order.customer_phone)
        .bind(order.service_type)
        .bind(&order.table_number)
        .bind(OrderStatus::New)
        .bind(&order.payment_method)
        .bind(&order.notes)
        .bind(&order.source)
        .bind(totals.subtotal.cents())
        .bind(totals.tax.cents())
        .bind(totals.discount.cents())
        .bind(totals.delivery_fee.cents())
        .bind(totals.tip.cents())
        .bind(totals.total.cents())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for item in items {
            let modifiers = serde_json::to_string(&item.modifiers)
                .map_err(|e| DbError::Internal(e.to_string()))?;

            sqlx::query(
                r#"
                INSERT INTO order_items (
                    order_id, item_id, item_name, base_price_cents, size, size_delta_cents,
                    modifiers, qty, line_total_cents, item_notes, voided
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0)
                "#,
            )
            .bind(order_id)
            .bind(&item.item_id)
            .bind(&item.item_name)
            .bind(item.base_price.cents())
            .bind(&item.size)
            .bind(item.size_delta.cents())
            .bind(modifiers)
            .bind(item.qty)
            .bind(item.line_total.cents())
            .bind(&item.notes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            order_id,
            items = items.len(),
            total = %order.totals.total,
            "Order created"
        );

        Ok(order_id)
    }

    /// Gets an order by id.
    pub async fn get_by_id(&self, id: OrderId) -> DbResult<Option<Order>> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Order::from))
    }

    /// Gets an order by id, failing with [`DbError::NotFound`].
    pub async fn require(&self, id: OrderId) -> DbResult<Order> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))
    }

    /// Gets all items of an order, voided ones included, in insertion order.
    pub async fn get_items(&self, order_id: OrderId) -> DbResult<Vec<OrderItem>> {
        let rows: Vec<OrderItemRow> = sqlx::query_as(&format!(
            "SELECT {} FROM order_items WHERE order_id = ?1 ORDER BY id",
            ITEM_COLUMNS
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderItem::try_from).collect()
    }

    /// Sets the kitchen status. Any target is accepted.
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> DbResult<()> {
        debug!(order_id = id, status = %status, "Updating order status");

        let result = sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Sets the paid flag.
    ///
    /// ## Idempotency
    /// Returns `true` when the flag changed and `false` when it already had
    /// the requested value. `paid_at` is stamped the first time an order
    /// becomes paid and kept afterwards. Customer aggregates are never
    /// touched.
    pub async fn set_paid(&self, id: OrderId, paid: bool) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                paid = ?2,
                paid_at = CASE WHEN ?2 THEN COALESCE(paid_at, ?3) ELSE paid_at END
            WHERE id = ?1 AND paid <> ?2
            "#,
        )
        .bind(id)
        .bind(paid)
        .bind(timestamp(Utc::now()))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            info!(order_id = id, paid, "Order paid flag changed");
            return Ok(true);
        }

        if self.exists(id).await? {
            debug!(order_id = id, paid, "Order paid flag already set");
            Ok(false)
        } else {
            Err(DbError::not_found("Order", id))
        }
    }

    /// Sets the archived flag.
    pub async fn set_archived(&self, id: OrderId, archived: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE orders SET archived = ?2 WHERE id = ?1")
            .bind(id)
            .bind(archived)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Remembers the provider session created for this order.
    pub async fn record_checkout_session(&self, id: OrderId, session_id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE orders SET checkout_session_id = ?2 WHERE id = ?1")
            .bind(id)
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Flags a line item as voided. The row and the order totals stay.
    pub async fn void_item(&self, item_id: i64) -> DbResult<()> {
        let result = sqlx::query("UPDATE order_items SET voided = 1 WHERE id = ?1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order item", item_id));
        }

        Ok(())
    }

    /// Lists orders matching the filter, newest first by id.
    ///
    /// Date bounds are whole UTC days, both inclusive.
    pub async fn list(&self, filter: &OrderFilter) -> DbResult<Vec<Order>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM orders WHERE 1 = 1", ORDER_COLUMNS));

        if let Some(from) = filter.from {
            qb.push(" AND created_at >= ").push_bind(day_start(from));
        }
        if let Some(next_day) = filter.to.and_then(|to| to.succ_opt()) {
            qb.push(" AND created_at < ").push_bind(day_start(next_day));
        }
        if !filter.statuses.is_empty() {
            qb.push(" AND status IN (");
            let mut statuses = qb.separated(", ");
            for status in &filter.statuses {
                statuses.push_bind(status.as_str());
            }
            statuses.push_unseparated(")");
        }
        if let Some(paid) = filter.paid {
            qb.push(" AND paid = ").push_bind(paid);
        }
        if let Some(archived) = filter.archived {
            qb.push(" AND archived = ").push_bind(archived);
        }

        qb.push(" ORDER BY id DESC");

        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }

        let rows: Vec<OrderRow> = qb.build_query_as::<OrderRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Non-archived orders still in the kitchen, newest first, with their
    /// non-voided items.
    pub async fn kitchen_queue(&self) -> DbResult<Vec<KitchenTicket>> {
        let filter = OrderFilter::new()
            .statuses(OrderStatus::ACTIVE)
            .archived(false);

        let orders = self.list(&filter).await?;
        let mut tickets = Vec::with_capacity(orders.len());

        for order in orders {
            let items = self
                .get_items(order.id)
                .await?
                .into_iter()
                .filter(|item| !item.voided)
                .collect();
            tickets.push(KitchenTicket { order, items });
        }

        Ok(tickets)
    }

    /// Order count and gross over non-archived orders created on `day` (UTC).
    pub async fn daily_summary(&self, day: NaiveDate) -> DbResult<DailySummary> {
        let end = day
            .succ_opt()
            .map(day_start)
            .unwrap_or_else(|| "9999-12-31T23:59:59.999999Z".to_string());

        let (count, gross): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total_cents), 0)
            FROM orders
            WHERE archived = 0 AND created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(day_start(day))
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(DailySummary::new(day, count, Money::from_cents(gross)))
    }

    async fn exists(&self, id: OrderId) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;
    use fireside_core::{CARD_PAYMENT_METHOD, DEFAULT_ORDER_SOURCE};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_order(phone: Option<&str>, total_cents: i64) -> NewOrder {
        NewOrder {
            customer_name: Some("Ana".to_string()),
            customer_phone: phone.map(str::to_string),
            service_type: ServiceType::Takeout,
            table_number: None,
            payment_method: Some(CARD_PAYMENT_METHOD.to_string()),
            notes: None,
            source: DEFAULT_ORDER_SOURCE.to_string(),
            totals: Totals {
                subtotal: Money::from_cents(total_cents),
                total: Money::from_cents(total_cents),
                ..Totals::default()
            },
        }
    }

    fn new_item(qty: i64) -> NewOrderItem {
        NewOrderItem {
            item_id: "pz_margherita".to_string(),
            item_name: "Margherita".to_string(),
            base_price: Money::from_cents(1200),
            size: Some("Medium 12\"".to_string()),
            size_delta: Money::from_cents(300),
            modifiers: vec![Modifier {
                name: "Pepperoni".to_string(),
                price_delta: Money::from_cents(150),
            }],
            qty,
            line_total: Money::from_cents(1650 * qty),
            notes: Some("well done".to_string()),
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let db = test_db().await;
        let repo = db.orders();

        let id = repo
            .create_order(&new_order(None, 3300), &[new_item(2), new_item(1)])
            .await
            .unwrap();

        let order = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::New);
        assert!(!order.paid);
        assert!(!order.archived);
        assert_eq!(order.totals.total.cents(), 3300);
        assert_eq!(order.service_type, ServiceType::Takeout);
        assert_eq!(order.paid_at, None);

        let items = repo.get_items(id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].qty, 2);
        assert_eq!(items[0].line_total.cents(), 3300);
        assert_eq!(items[0].modifiers[0].name, "Pepperoni");
        assert_eq!(items[0].modifiers[0].price_delta.cents(), 150);
        assert_eq!(items[0].notes.as_deref(), Some("well done"));
    }

    #[tokio::test]
    async fn test_order_ids_increase() {
        let db = test_db().await;
        let repo = db.orders();
        let first = repo.create_order(&new_order(None, 100), &[new_item(1)]).await.unwrap();
        let second = repo.create_order(&new_order(None, 100), &[new_item(1)]).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_customer_aggregate_on_create() {
        let db = test_db().await;
        let repo = db.orders();

        repo.create_order(&new_order(Some("555-0101"), 2000), &[new_item(1)])
            .await
            .unwrap();
        repo.create_order(&new_order(Some("555-0101"), 1500), &[new_item(1)])
            .await
            .unwrap();

        let customer = db.customers().get_by_phone("555-0101").await.unwrap().unwrap();
        assert_eq!(customer.orders_count, 2);
        assert_eq!(customer.total_spent.cents(), 3500);
        assert_eq!(customer.name.as_deref(), Some("Ana"));
    }

    #[tokio::test]
    async fn test_no_phone_no_customer() {
        let db = test_db().await;
        db.orders()
            .create_order(&new_order(None, 2000), &[new_item(1)])
            .await
            .unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_failed_item_rolls_back_everything() {
        let db = test_db().await;
        let repo = db.orders();

        let err = repo
            .create_order(&new_order(Some("555-0199"), 2000), &[new_item(1), new_item(0)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));

        let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orders, 0);
        assert_eq!(items, 0);
        assert!(db.customers().get_by_phone("555-0199").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_paid_is_idempotent() {
        let db = test_db().await;
        let repo = db.orders();
        let id = repo
            .create_order(&new_order(Some("555-0101"), 2500), &[new_item(1)])
            .await
            .unwrap();

        assert!(repo.set_paid(id, true).await.unwrap());
        let first = repo.require(id).await.unwrap();
        assert!(first.paid);
        assert!(first.paid_at.is_some());

        assert!(!repo.set_paid(id, true).await.unwrap());
        let second = repo.require(id).await.unwrap();
        assert_eq!(second, first);

        let customer = db.customers().get_by_phone("555-0101").await.unwrap().unwrap();
        assert_eq!(customer.orders_count, 1);
        assert_eq!(customer.total_spent.cents(), 2500);
    }

    #[tokio::test]
    async fn test_manual_unpaid_keeps_first_paid_at() {
        let db = test_db().await;
        let repo = db.orders();
        let id = repo.create_order(&new_order(None, 900), &[new_item(1)]).await.unwrap();

        repo.set_paid(id, true).await.unwrap();
        let stamped = repo.require(id).await.unwrap().paid_at;

        assert!(repo.set_paid(id, false).await.unwrap());
        assert!(!repo.require(id).await.unwrap().paid);

        assert!(repo.set_paid(id, true).await.unwrap());
        assert_eq!(repo.require(id).await.unwrap().paid_at, stamped);
    }

    #[tokio::test]
    async fn test_updates_on_missing_order() {
        let db = test_db().await;
        let repo = db.orders();

        assert!(repo.set_paid(404, true).await.unwrap_err().is_not_found());
        assert!(repo.update_status(404, OrderStatus::Ready).await.unwrap_err().is_not_found());
        assert!(repo.set_archived(404, true).await.unwrap_err().is_not_found());
        assert!(repo.record_checkout_session(404, "cs_x").await.unwrap_err().is_not_found());
        assert!(repo.void_item(404).await.unwrap_err().is_not_found());
        assert!(repo.get_by_id(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_accepts_any_status() {
        let db = test_db().await;
        let repo = db.orders();
        let id = repo.create_order(&new_order(None, 900), &[new_item(1)]).await.unwrap();

        repo.update_status(id, OrderStatus::Completed).await.unwrap();
        repo.update_status(id, OrderStatus::New).await.unwrap();
        assert_eq!(repo.require(id).await.unwrap().status, OrderStatus::New);
    }

    #[tokio::test]
    async fn test_record_checkout_session() {
        let db = test_db().await;
        let repo = db.orders();
        let id = repo.create_order(&new_order(None, 900), &[new_item(1)]).await.unwrap();

        repo.record_checkout_session(id, "cs_test_123").await.unwrap();
        let order = repo.require(id).await.unwrap();
        assert_eq!(order.checkout_session_id.as_deref(), Some("cs_test_123"));
        assert!(!order.paid);
    }

    #[tokio::test]
    async fn test_list_filters_and_order() {
        let db = test_db().await;
        let repo = db.orders();

        let a = repo
            .create_order_at(&new_order(None, 1000), &[new_item(1)], at(2026, 10, 16, 12))
            .await
            .unwrap();
        let b = repo
            .create_order_at(&new_order(None, 2000), &[new_item(1)], at(2026, 10, 17, 9))
            .await
            .unwrap();
        let c = repo
            .create_order_at(&new_order(None, 3000), &[new_item(1)], at(2026, 10, 17, 23))
            .await
            .unwrap();

        repo.set_paid(b, true).await.unwrap();
        repo.update_status(c, OrderStatus::Ready).await.unwrap();
        repo.set_archived(a, true).await.unwrap();

        let all = repo.list(&OrderFilter::new()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![c, b, a]);

        let day = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let on_day = repo.list(&OrderFilter::new().on(day)).await.unwrap();
        assert_eq!(on_day.iter().map(|o| o.id).collect::<Vec<_>>(), vec![c, b]);

        let paid = repo.list(&OrderFilter::new().paid(true)).await.unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].id, b);

        let ready = repo
            .list(&OrderFilter::new().statuses([OrderStatus::Ready, OrderStatus::Completed]))
            .await
            .unwrap();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].id, c);

        let live = repo.list(&OrderFilter::new().archived(false).limit(1)).await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, c);
    }

    #[tokio::test]
    async fn test_kitchen_queue() {
        let db = test_db().await;
        let repo = db.orders();

        let active = repo
            .create_order(&new_order(None, 1000), &[new_item(1), new_item(2)])
            .await
            .unwrap();
        let done = repo.create_order(&new_order(None, 1000), &[new_item(1)]).await.unwrap();
        let archived = repo.create_order(&new_order(None, 1000), &[new_item(1)]).await.unwrap();
        let newest = repo.create_order(&new_order(None, 1000), &[new_item(1)]).await.unwrap();

        repo.update_status(done, OrderStatus::Completed).await.unwrap();
        repo.set_archived(archived, true).await.unwrap();

        let first_item = repo.get_items(active).await.unwrap()[0].id;
        repo.void_item(first_item).await.unwrap();

        let queue = repo.kitchen_queue().await.unwrap();
        let ids: Vec<_> = queue.iter().map(|t| t.order.id).collect();
        assert_eq!(ids, vec![newest, active]);
        assert_eq!(queue[1].items.len(), 1);
        assert_eq!(queue[1].items[0].qty, 2);

        // voided lines are kept in storage
        assert_eq!(repo.get_items(active).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_daily_summary() {
        let db = test_db().await;
        let repo = db.orders();

        repo.create_order_at(&new_order(None, 1000), &[new_item(1)], at(2026, 10, 18, 1))
            .await
            .unwrap();
        repo.create_order_at(&new_order(None, 2001), &[new_item(1)], at(2026, 10, 18, 22))
            .await
            .unwrap();
        let hidden = repo
            .create_order_at(&new_order(None, 5000), &[new_item(1)], at(2026, 10, 18, 12))
            .await
            .unwrap();
        repo.create_order_at(&new_order(None, 7000), &[new_item(1)], at(2026, 10, 19, 0))
            .await
            .unwrap();
        repo.set_archived(hidden, true).await.unwrap();

        let day = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let summary = repo.daily_summary(day).await.unwrap();
        assert_eq!(summary.order_count, 2);
        assert_eq!(summary.gross.cents(), 3001);
        assert_eq!(summary.average_ticket.cents(), 1501);

        let empty = repo
            .daily_summary(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(empty.order_count, 0);
        assert_eq!(empty.gross, Money::zero());
    }

    #[tokio::test]
    async fn test_concurrent_set_paid_from_two_processes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("race.db");

        let desk = Database::new(DbConfig::new(&path)).await.unwrap();
        let webhook = Database::new(DbConfig::new(&path)).await.unwrap();

        let id = desk
            .orders()
            .create_order(&new_order(Some("555-0123"), 4200), &[new_item(1)])
            .await
            .unwrap();

        let a = tokio::spawn({
            let repo = desk.orders();
            async move { repo.set_paid(id, true).await }
        });
        let b = tokio::spawn({
            let repo = webhook.orders();
            async move { repo.set_paid(id, true).await }
        });

        let flipped = [a.await.unwrap().unwrap(), b.await.unwrap().unwrap()];
        assert_eq!(flipped.iter().filter(|f| **f).count(), 1);

        let order = desk.orders().require(id).await.unwrap();
        assert!(order.paid);
        let customer = desk.customers().get_by_phone("555-0123").await.unwrap().unwrap();
        assert_eq!(customer.orders_count, 1);
        assert_eq!(customer.total_spent.cents(), 4200);
    }
}

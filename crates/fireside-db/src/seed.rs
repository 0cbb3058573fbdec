//! # Demo Orders
//!
//! Fills a development database with orders priced from the catalog, used
//! by the `seed` binary.
//!
//! ```text
//! n = 0..count
//!   guest     GUESTS[n % 5]           (repeat phones build customer history)
//!   service   DineIn ► Takeout ► Delivery
//!   lines     1 to 3 demo lines, priced with CartLine::from_menu_item
//!   status    New ► InProgress ► Ready ► Completed
//!   paid      every even n
//!   created   15 minutes apart, the last one at `now`
//! ```

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::error::DbResult;
use crate::pool::Database;
use fireside_core::{
    order_totals, CartLine, Catalog, Money, NewOrder, NewOrderItem, OrderId, OrderStatus,
    ServiceType, TaxRate, CARD_PAYMENT_METHOD, DEFAULT_DELIVERY_FEE_CENTS, DEFAULT_ORDER_SOURCE,
};

/// Demo guests; the ones with phones build up customer history.
const GUESTS: &[(&str, Option<&str>)] = &[
    ("Ana", Some("555-0101")),
    ("Ben", None),
    ("Chloe", Some("555-0142")),
    ("Dev", Some("555-0101")),
    ("Guest", None),
];

/// `(item id, size, toppings, qty)` per demo line.
const LINES: &[(&str, Option<&str>, &[&str], i64)] = &[
    ("pz_margherita", Some("Medium 12\""), &["Mushrooms"], 1),
    ("pz_pepperoni", Some("Large 16\""), &["Jalapeños", "Extra Cheese"], 1),
    ("sd_garlic_knots", None, &["Marinara"], 2),
    ("dr_soda", Some("Lg"), &[], 3),
];

const SERVICE_TYPES: [ServiceType; 3] = [
    ServiceType::DineIn,
    ServiceType::Takeout,
    ServiceType::Delivery,
];

const STATUSES: [OrderStatus; 4] = [
    OrderStatus::New,
    OrderStatus::InProgress,
    OrderStatus::Ready,
    OrderStatus::Completed,
];

/// One order written by [`seed_demo_orders`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededOrder {
    pub id: OrderId,
    pub customer_name: String,
    pub service_type: ServiceType,
    pub status: OrderStatus,
    pub paid: bool,
    pub total: Money,
}

/// Places up to `count` demo orders, the last one created at `now`.
///
/// Lines whose item is missing from `catalog` are skipped, and so is an
/// order left with no lines.
pub async fn seed_demo_orders(
    db: &Database,
    catalog: &Catalog,
    count: usize,
    now: DateTime<Utc>,
) -> DbResult<Vec<SeededOrder>> {
    let orders = db.orders();
    let mut seeded = Vec::with_capacity(count);

    for n in 0..count {
        let (name, phone) = GUESTS[n % GUESTS.len()];
        let service_type = SERVICE_TYPES[n % SERVICE_TYPES.len()];

        let lines = demo_lines(catalog, n);
        if lines.is_empty() {
            continue;
        }

        let subtotal: Money = lines.iter().map(|l| l.line_total).sum();
        let delivery_fee = if service_type == ServiceType::Delivery {
            Money::from_cents(DEFAULT_DELIVERY_FEE_CENTS)
        } else {
            Money::zero()
        };
        let tip = Money::from_cents(100 * (n as i64 % 4));
        let totals = match order_totals(subtotal, TaxRate::default(), Money::zero(), delivery_fee, tip) {
            Ok(totals) => totals,
            Err(e) => {
                warn!(n, error = %e, "Skipping demo order");
                continue;
            }
        };

        let order = NewOrder {
            customer_name: Some(name.to_string()),
            customer_phone: phone.map(str::to_string),
            service_type,
            table_number: (service_type == ServiceType::DineIn).then(|| format!("{}", 1 + n % 12)),
            payment_method: Some(CARD_PAYMENT_METHOD.to_string()),
            notes: None,
            source: DEFAULT_ORDER_SOURCE.to_string(),
            totals,
        };
        let items: Vec<NewOrderItem> = lines.iter().map(NewOrderItem::from).collect();

        let created_at = now - Duration::minutes(15 * (count - 1 - n) as i64);
        let id = orders.create_order_at(&order, &items, created_at).await?;

        let status = STATUSES[n % STATUSES.len()];
        orders.update_status(id, status).await?;
        let paid = n % 2 == 0;
        if paid {
            orders.set_paid(id, true).await?;
        }

        debug!(order_id = id, %status, paid, "Seeded demo order");
        seeded.push(SeededOrder {
            id,
            customer_name: name.to_string(),
            service_type,
            status,
            paid,
            total: totals.total,
        });
    }

    Ok(seeded)
}

fn demo_lines(catalog: &Catalog, n: usize) -> Vec<CartLine> {
    let mut lines = Vec::new();
    for (item_id, size, toppings, qty) in LINES.iter().cycle().skip(n).take(1 + n % 3) {
        let Ok(item) = catalog.find_item(item_id) else {
            warn!(item_id, "Skipping demo line: not in this catalog");
            continue;
        };
        let toppings: Vec<String> = toppings.iter().map(|t| t.to_string()).collect();
        match CartLine::from_menu_item(item, *qty, *size, &toppings, None) {
            Ok(line) => lines.push(line),
            Err(e) => warn!(item_id, error = %e, "Skipping demo line"),
        }
    }
    lines
}

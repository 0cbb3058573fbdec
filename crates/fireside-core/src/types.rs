//! # Domain Types
//!
//! Orders, order items, customers and the enums that drive the kitchen and
//! payment flow.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Order Domain                                   │
//! │                                                                         │
//! │  ┌─────────────────┐ 1   * ┌─────────────────┐    ┌─────────────────┐  │
//! │  │     Order       │──────►│   OrderItem     │    │    Customer     │  │
//! │  │  ─────────────  │       │  ─────────────  │    │  ─────────────  │  │
//! │  │  status         │       │  item snapshot  │    │  phone (unique) │  │
//! │  │  paid           │       │  modifiers      │    │  total_spent    │  │
//! │  │  archived       │       │  line_total     │    │  orders_count   │  │
//! │  │  totals (frozen)│       │  voided         │    └─────────────────┘  │
//! │  └─────────────────┘       └─────────────────┘                          │
//! │                                                                         │
//! │  OrderStatus:  New ──► InProgress ──► Ready ──► Completed               │
//! │  paid:         false ──► true  (payment confirmation or manual)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `CartLine` and `OrderItem` carry their own copy of every price they were
//! built from. A catalog edit after the order is placed never changes what
//! the order says it cost.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::catalog::MenuItem;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{self, Money};
use crate::pricing::{self, Totals};
use crate::MAX_LINE_QUANTITY;

/// Order ids are SQLite rowids: assigned on insert, increasing.
pub type OrderId = i64;

/// Payment method recorded on orders placed through card checkout.
pub const CARD_PAYMENT_METHOD: &str = "Card (Stripe)";

/// Default `source` for orders entered at the front desk.
pub const DEFAULT_ORDER_SOURCE: &str = "POS";

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 850 bps = 8.5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a fraction (`0.085` → 850 bps).
    ///
    /// Rejects negative, non-finite and >100% rates.
    ///
    /// ```rust
    /// use fireside_core::types::TaxRate;
    ///
    /// assert_eq!(TaxRate::from_fraction(0.085).unwrap().bps(), 850);
    /// assert!(TaxRate::from_fraction(-0.01).is_err());
    /// ```
    pub fn from_fraction(fraction: f64) -> Result<Self, ValidationError> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(ValidationError::InvalidFormat {
                field: "tax_rate".to_string(),
                reason: format!("{} is not between 0 and 1", fraction),
            });
        }
        Ok(TaxRate((fraction * 10_000.0).round() as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Service Type
// =============================================================================

/// How the customer receives the order.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    #[default]
    DineIn,
    Takeout,
    Delivery,
}

impl ServiceType {
    /// Human label shown on tickets.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::DineIn => "Dine-In",
            ServiceType::Takeout => "Takeout",
            ServiceType::Delivery => "Delivery",
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Kitchen status of an order.
///
/// ## State Machine
/// ```text
/// New ──start──► InProgress ──ready──► Ready ──complete──► Completed
/// ```
/// The store accepts any target; the command layer only offers the forward
/// step returned by [`OrderStatus::next`].
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    New,
    InProgress,
    Ready,
    Completed,
}

impl OrderStatus {
    /// Statuses that still belong on the kitchen display.
    pub const ACTIVE: [OrderStatus; 3] = [OrderStatus::New, OrderStatus::InProgress, OrderStatus::Ready];

    /// Storage / wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
        }
    }

    /// Human label.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::New => "New",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::Ready => "Ready",
            OrderStatus::Completed => "Completed",
        }
    }

    /// The next kitchen step, or `None` once completed.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::New => Some(OrderStatus::InProgress),
            OrderStatus::InProgress => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(OrderStatus::New),
            "in_progress" => Ok(OrderStatus::InProgress),
            "ready" => Ok(OrderStatus::Ready),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown status '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Modifiers and Cart Lines
// =============================================================================

/// A selected topping, frozen at selection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    #[serde(with = "money::decimal")]
    pub price_delta: Money,
}

/// One priced line in a cart, before the order exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: String,
    pub item_name: String,
    pub base_price: Money,
    pub size: Option<String>,
    pub size_delta: Money,
    pub modifiers: Vec<Modifier>,
    pub qty: i64,
    pub notes: Option<String>,
    pub line_total: Money,
}

impl CartLine {
    /// Builds a line from the live catalog entry.
    ///
    /// ## Lookup Rules
    /// - `size` that the item does not offer prices at zero delta but is kept
    ///   on the line as entered
    /// - topping names the item does not offer become zero-delta modifiers
    /// - `qty` below 1 is clamped to 1
    ///
    /// ## Errors
    /// - [`CoreError::QuantityTooLarge`] above [`MAX_LINE_QUANTITY`], checked
    ///   before anything is priced
    /// - a `TooLarge` validation error from [`pricing::line_total`]
    pub fn from_menu_item(
        item: &MenuItem,
        qty: i64,
        size: Option<&str>,
        toppings: &[String],
        notes: Option<String>,
    ) -> CoreResult<Self> {
        let qty = check_line_quantity(qty)?;
        let size_delta = size.map(|s| item.size_delta(s)).unwrap_or_default();
        let modifiers: Vec<Modifier> = toppings
            .iter()
            .map(|name| Modifier {
                name: name.clone(),
                price_delta: item.topping_delta(name),
            })
            .collect();
        let line_total = pricing::line_total(item, qty, size, &modifiers)?;

        Ok(CartLine {
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            base_price: item.base_price,
            size: size.map(str::to_string),
            size_delta,
            modifiers,
            qty,
            notes: notes.filter(|n| !n.trim().is_empty()),
            line_total,
        })
    }

    /// Changes the quantity (floor 1) and reprices from the snapshot.
    ///
    /// The line is left untouched on error.
    pub fn set_qty(&mut self, qty: i64) -> CoreResult<()> {
        let qty = check_line_quantity(qty)?;
        self.line_total = pricing::price_line(self.base_price, self.size_delta, &self.modifiers, qty)?;
        self.qty = qty;
        Ok(())
    }
}

/// Clamps a line quantity to at least 1 and enforces [`MAX_LINE_QUANTITY`].
fn check_line_quantity(qty: i64) -> CoreResult<i64> {
    if qty > MAX_LINE_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: qty,
            max: MAX_LINE_QUANTITY,
        });
    }
    Ok(qty.max(1))
}

// =============================================================================
// Customer
// =============================================================================

/// A repeat customer, deduplicated by phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: Option<String>,
    pub phone: String,
    /// Sum of placed order totals (paid or not).
    pub total_spent: Money,
    pub orders_count: i64,
}

// =============================================================================
// Order
// =============================================================================

/// A placed order with its frozen totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: OrderId,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub service_type: ServiceType,
    pub table_number: Option<String>,
    pub status: OrderStatus,
    pub paid: bool,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub source: String,
    pub totals: Totals,
    pub archived: bool,
    pub checkout_session_id: Option<String>,
    #[ts(as = "Option<String>")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Label shown on the provider's checkout page.
    pub fn checkout_label(&self) -> String {
        format!(
            "Order #{} - {}",
            self.id,
            self.customer_name.as_deref().unwrap_or("Guest")
        )
    }
}

/// A line item of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: OrderId,
    pub item_id: String,
    pub item_name: String,
    pub base_price: Money,
    pub size: Option<String>,
    pub size_delta: Money,
    pub modifiers: Vec<Modifier>,
    pub qty: i64,
    pub line_total: Money,
    pub notes: Option<String>,
    pub voided: bool,
}

/// Order header to insert. Status, paid and archived start at their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub service_type: ServiceType,
    pub table_number: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub source: String,
    pub totals: Totals,
}

/// Line item to insert alongside a [`NewOrder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub item_id: String,
    pub item_name: String,
    pub base_price: Money,
    pub size: Option<String>,
    pub size_delta: Money,
    pub modifiers: Vec<Modifier>,
    pub qty: i64,
    pub line_total: Money,
    pub notes: Option<String>,
}

impl From<&CartLine> for NewOrderItem {
    fn from(line: &CartLine) -> Self {
        NewOrderItem {
            item_id: line.item_id.clone(),
            item_name: line.item_name.clone(),
            base_price: line.base_price,
            size: line.size.clone(),
            size_delta: line.size_delta,
            modifiers: line.modifiers.clone(),
            qty: line.qty,
            line_total: line.line_total,
            notes: line.notes.clone(),
        }
    }
}

// =============================================================================
// Queries and Reports
// =============================================================================

/// Filter for order listings. Empty filter lists everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    /// Inclusive first calendar day (UTC).
    pub from: Option<NaiveDate>,
    /// Inclusive last calendar day (UTC).
    pub to: Option<NaiveDate>,
    /// Empty means any status.
    pub statuses: Vec<OrderStatus>,
    pub paid: Option<bool>,
    pub archived: Option<bool>,
    pub limit: Option<i64>,
}

impl OrderFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn on(self, day: NaiveDate) -> Self {
        self.between(day, day)
    }

    pub fn statuses(mut self, statuses: impl IntoIterator<Item = OrderStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn paid(mut self, paid: bool) -> Self {
        self.paid = Some(paid);
        self
    }

    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = Some(archived);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// "Today at a glance" numbers for the manager view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub order_count: i64,
    pub gross: Money,
    /// Gross divided by order count, rounded half-up; zero with no orders.
    pub average_ticket: Money,
}

impl DailySummary {
    pub fn new(date: NaiveDate, order_count: i64, gross: Money) -> Self {
        let average_ticket = if order_count > 0 {
            Money::from_cents((gross.cents() * 2 + order_count) / (order_count * 2))
        } else {
            Money::zero()
        };
        DailySummary {
            date,
            order_count,
            gross,
            average_ticket,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

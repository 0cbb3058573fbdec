//! # Order Commands
//!
//! ## Place Order Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  place_order(form)                                                      │
//! │    │                                                                    │
//! │    ├─ 1. cart not empty, adjustments ≥ 0, phone/name/notes valid        │
//! │    ├─ 2. table only for Dine-In, delivery fee only for Delivery         │
//! │    ├─ 3. order_totals(subtotal, tax, discount, fee, tip)                │
//! │    ├─ 4. create_order: order + items + customer, one transaction        │
//! │    ├─ 5. clear the cart                                                 │
//! │    └─ 6. begin_checkout ──► Started { url }                             │
//! │                        └──► Failed { error }  (order stays, unpaid)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! A failed checkout does not fail the command: the order is already
//! committed and `start_checkout` can retry it.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::payment::begin_checkout;
use crate::error::ApiError;
use crate::state::{AppContext, SessionContext};
use fireside_core::validation::{
    validate_adjustment, validate_optional_text, validate_phone, MAX_NAME_LEN, MAX_NOTES_LEN,
};
use fireside_core::{
    order_totals, CoreError, Money, NewOrder, NewOrderItem, OrderId, ServiceType, TaxRate, Totals,
    CARD_PAYMENT_METHOD, DEFAULT_ORDER_SOURCE,
};

/// The order form below the cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderForm {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub service_type: ServiceType,
    /// Kept only for Dine-In.
    pub table_number: Option<String>,
    /// Overrides the session fee; kept only for Delivery.
    pub delivery_fee: Option<Money>,
    pub discount: Money,
    pub tip: Money,
    /// Overrides the session tax rate.
    pub tax_rate: Option<TaxRate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckoutState {
    /// Send the customer to `url`.
    Started { url: String, session_id: String },
    /// The order exists unpaid; retry with `start_checkout`.
    Failed { error: ApiError },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceOrderResponse {
    pub order_id: OrderId,
    pub totals: Totals,
    pub checkout: CheckoutState,
}

/// Prices the cart with the form adjustments without placing anything.
pub fn preview_totals(session: &SessionContext, form: &OrderForm) -> Result<Totals, ApiError> {
    let (_, delivery_fee) = service_fields(session, form)?;
    validate_money(form, delivery_fee)?;
    let totals = order_totals(
        session.cart.subtotal(),
        form.tax_rate.unwrap_or(session.tax_rate),
        form.discount,
        delivery_fee,
        form.tip,
    )?;
    Ok(totals)
}

/// Places the cart as an order and starts card checkout.
pub async fn place_order(
    ctx: &AppContext,
    session: &mut SessionContext,
    form: OrderForm,
) -> Result<PlaceOrderResponse, ApiError> {
    debug!(lines = session.cart.line_count(), "place_order command");

    if session.cart.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let totals = preview_totals(session, &form)?;
    let (table_number, _) = service_fields(session, &form)?;

    let order = NewOrder {
        customer_name: validate_optional_text(
            "customer name",
            form.customer_name.as_deref(),
            MAX_NAME_LEN,
        )?,
        customer_phone: validate_phone(form.customer_phone.as_deref())?,
        service_type: form.service_type,
        table_number,
        payment_method: Some(CARD_PAYMENT_METHOD.to_string()),
        notes: validate_optional_text("notes", form.notes.as_deref(), MAX_NOTES_LEN)?,
        source: DEFAULT_ORDER_SOURCE.to_string(),
        totals,
    };
    let items: Vec<NewOrderItem> = session.cart.lines().iter().map(NewOrderItem::from).collect();

    let order_id = ctx.db.orders().create_order(&order, &items).await?;
    session.cart.clear();
    info!(order_id, total = %totals.total, items = items.len(), "Order placed");

    let placed = ctx.db.orders().require(order_id).await?;
    let checkout = match begin_checkout(ctx, &placed).await {
        Ok(session) => CheckoutState::Started {
            url: session.url,
            session_id: session.session_id,
        },
        Err(error) => {
            warn!(order_id, error = %error, "Checkout could not be started");
            CheckoutState::Failed { error }
        }
    };

    Ok(PlaceOrderResponse {
        order_id,
        totals,
        checkout,
    })
}

/// Table number and delivery fee as they apply to the chosen service type.
fn service_fields(
    session: &SessionContext,
    form: &OrderForm,
) -> Result<(Option<String>, Money), ApiError> {
    Ok(match form.service_type {
        ServiceType::DineIn => (
            validate_optional_text("table number", form.table_number.as_deref(), MAX_NAME_LEN)?,
            Money::zero(),
        ),
        ServiceType::Delivery => (None, form.delivery_fee.unwrap_or(session.delivery_fee)),
        ServiceType::Takeout => (None, Money::zero()),
    })
}

fn validate_money(form: &OrderForm, delivery_fee: Money) -> Result<(), ApiError> {
    validate_adjustment("discount", form.discount)?;
    validate_adjustment("tip", form.tip)?;
    validate_adjustment("delivery fee", delivery_fee)?;
    Ok(())
}

//! # Pricing Engine
//!
//! Pure functions for line totals and order totals.
//!
//! ## Order Totals
//! ```text
//! subtotal ──► − discount ──► clamp at 0 ──► discounted
//!                                               │
//!                                               ├──► × tax rate (half-up) ──► tax
//!                                               ▼
//!                          discounted + tax + delivery fee + tip ──► total
//! ```
//!
//! Every amount is already whole cents, so the "round to 2 decimal places"
//! steps reduce to the tax rounding in [`Money::calculate_tax`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::MenuItem;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Modifier, TaxRate};
use crate::validation::MAX_AMOUNT;

/// Price of one cart line.
///
/// `(base + size delta + Σ modifier deltas) × max(1, qty)`. A size the item
/// does not offer, or no size, contributes zero.
///
/// ## Errors
/// [`ValidationError::TooLarge`] when the line is above [`MAX_AMOUNT`] or
/// cannot be computed in i64 cents.
///
/// ```rust
/// use fireside_core::{line_total, Catalog, Modifier, Money};
///
/// let catalog = Catalog::default_menu().unwrap();
/// let pizza = catalog.find_item("pz_margherita").unwrap();
/// let toppings = [
///     Modifier { name: "Pepperoni".into(), price_delta: Money::from_cents(150) },
///     Modifier { name: "Mushrooms".into(), price_delta: Money::from_cents(100) },
/// ];
/// let total = line_total(pizza, 2, Some("Medium 12\""), &toppings).unwrap();
/// assert_eq!(total.cents(), 3500);
/// ```
pub fn line_total(
    item: &MenuItem,
    qty: i64,
    size: Option<&str>,
    modifiers: &[Modifier],
) -> CoreResult<Money> {
    let size_delta = size.map(|s| item.size_delta(s)).unwrap_or_default();
    price_line(item.base_price, size_delta, modifiers, qty)
}

/// [`line_total`] from already frozen prices, as stored on a cart line.
pub fn price_line(
    base_price: Money,
    size_delta: Money,
    modifiers: &[Modifier],
    qty: i64,
) -> CoreResult<Money> {
    let total = base_price
        .checked_add(size_delta)
        .and_then(|unit| {
            modifiers
                .iter()
                .try_fold(unit, |unit, m| unit.checked_add(m.price_delta))
        })
        .and_then(|unit| unit.checked_mul(qty.max(1)))
        .filter(|total| total.abs() <= MAX_AMOUNT);

    total.ok_or_else(|| CoreError::from(ValidationError::too_large("line total", MAX_AMOUNT)))
}

/// Frozen money snapshot of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub delivery_fee: Money,
    pub tip: Money,
    pub total: Money,
}

impl Totals {
    /// Subtotal after discount, never below zero.
    pub fn discounted_subtotal(&self) -> Money {
        self.subtotal.saturating_sub_to_zero(self.discount)
    }
}

/// Computes order totals from a cart subtotal and the order form adjustments.
///
/// The returned `discount` is the amount requested, even when it exceeds the
/// subtotal; only the discounted subtotal is clamped.
///
/// ## Errors
/// [`ValidationError::TooLarge`] when the total cannot be computed in i64
/// cents. Callers bound the adjustments with
/// [`validate_adjustment`](crate::validation::validate_adjustment) first.
pub fn order_totals(
    subtotal: Money,
    tax_rate: TaxRate,
    discount: Money,
    delivery_fee: Money,
    tip: Money,
) -> CoreResult<Totals> {
    let discounted = subtotal.saturating_sub_to_zero(discount);
    let tax = discounted.calculate_tax(tax_rate);
    let total = discounted
        .checked_add(tax)
        .and_then(|t| t.checked_add(delivery_fee))
        .and_then(|t| t.checked_add(tip))
        .ok_or_else(|| ValidationError::too_large("order total", Money::from_cents(i64::MAX)))?;

    Ok(Totals {
        subtotal,
        tax,
        discount,
        delivery_fee,
        tip,
        total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn modifier(name: &str, cents: i64) -> Modifier {
        Modifier {
            name: name.to_string(),
            price_delta: Money::from_cents(cents),
        }
    }

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn test_line_total_scenario() {
        let catalog = Catalog::default_menu().unwrap();
        let pizza = catalog.find_item("pz_margherita").unwrap();
        let mods = [modifier("Pepperoni", 150), modifier("Mushrooms", 100)];

        // (12 + 3 + 1.5 + 1.0) × 2
        assert_eq!(line_total(pizza, 2, Some("Medium 12\""), &mods).unwrap().cents(), 3500);
    }

    #[test]
    fn test_line_total_is_linear_in_qty() {
        let catalog = Catalog::default_menu().unwrap();
        let mods = [modifier("Extra Cheese", 150)];
        for item in catalog.items() {
            let one = line_total(item, 1, item.default_size(), &mods).unwrap();
            let mut previous = one;
            for qty in 1..=12 {
                let total = line_total(item, qty, item.default_size(), &mods).unwrap();
                assert_eq!(total, one * qty);
                assert!(total >= previous);
                previous = total;
            }
        }
    }

    #[test]
    fn test_line_total_clamps_qty() {
        let catalog = Catalog::default_menu().unwrap();
        let soda = catalog.find_item("dr_soda").unwrap();
        assert_eq!(line_total(soda, 0, None, &[]).unwrap().cents(), 250);
        assert_eq!(line_total(soda, -3, Some("Lg"), &[]).unwrap().cents(), 325);
    }

    #[test]
    fn test_line_total_unmatched_size_is_zero() {
        let catalog = Catalog::default_menu().unwrap();
        let soda = catalog.find_item("dr_soda").unwrap();
        assert_eq!(line_total(soda, 1, Some("Bucket"), &[]).unwrap().cents(), 250);
    }

    #[test]
    fn test_order_totals_scenario() {
        let totals = order_totals(cents(3500), TaxRate::from_bps(850), cents(500), cents(300), cents(400)).unwrap();
        assert_eq!(totals.discounted_subtotal().cents(), 3000);
        assert_eq!(totals.tax.cents(), 255);
        assert_eq!(totals.total.cents(), 3955);
        assert_eq!(totals.subtotal.cents(), 3500);
        assert_eq!(totals.discount.cents(), 500);
    }

    #[test]
    fn test_order_totals_all_zero() {
        let totals = order_totals(Money::zero(), TaxRate::zero(), Money::zero(), Money::zero(), Money::zero()).unwrap();
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn test_discount_larger_than_subtotal_clamps() {
        let totals = order_totals(cents(1000), TaxRate::from_bps(850), cents(2500), Money::zero(), Money::zero()).unwrap();
        assert_eq!(totals.discounted_subtotal(), Money::zero());
        assert_eq!(totals.tax, Money::zero());
        assert_eq!(totals.total, Money::zero());
    }

    #[test]
    fn test_empty_cart_total_is_fee_plus_tip() {
        let totals = order_totals(Money::zero(), TaxRate::from_bps(850), Money::zero(), cents(300), cents(200)).unwrap();
        assert_eq!(totals.tax, Money::zero());
        assert_eq!(totals.total.cents(), 500);
    }

    #[test]
    fn test_fee_and_tip_are_not_taxed() {
        let totals = order_totals(cents(1000), TaxRate::from_bps(1000), Money::zero(), cents(300), cents(500)).unwrap();
        assert_eq!(totals.tax.cents(), 100);
        assert_eq!(totals.total.cents(), 1900);
    }

    #[test]
    fn test_line_total_rejects_overflowing_qty() {
        let catalog = Catalog::default_menu().unwrap();
        let soda = catalog.find_item("dr_soda").unwrap();
        let err = line_total(soda, i64::MAX / 100, None, &[]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_line_total_ceiling() {
        let mods = [modifier("Gold Leaf", 50_000_000)];
        // 0.5M + 0.5M is exactly at the ceiling
        assert_eq!(price_line(cents(50_000_000), Money::zero(), &mods, 1).unwrap(), MAX_AMOUNT);
        assert!(price_line(cents(50_000_000), Money::zero(), &mods, 2).is_err());
        assert!(price_line(cents(i64::MAX), cents(1), &[], 1).is_err());
    }

    #[test]
    fn test_order_totals_rejects_overflow() {
        let err = order_totals(
            cents(1000),
            TaxRate::from_bps(850),
            Money::zero(),
            Money::zero(),
            cents(i64::MAX),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_huge_discount_does_not_wrap() {
        let totals = order_totals(cents(1000), TaxRate::from_bps(850), cents(i64::MAX), Money::zero(), Money::zero())
            .unwrap();
        assert_eq!(totals.total, Money::zero());
    }
}

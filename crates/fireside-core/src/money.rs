//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Cents Inside, Decimals at the Edges
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  menu.json            fireside-core             SQLite / provider      │
//! │  ─────────            ─────────────             ─────────────────      │
//! │  "base_price": 12.0 ─► Money(1200) ──► math ──► subtotal_cents = 1200   │
//! │                                                 unit_amount   = 1200   │
//! │                                                                         │
//! │  Decimal prices are converted exactly once, when the catalog is read.  │
//! │  Every total after that is integer arithmetic on cents.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fireside_core::money::Money;
//!
//! let price = Money::from_cents(1250); // $12.50
//! let two = price * 2;
//! assert_eq!(two.cents(), 2500);
//!
//! // Catalog boundary only
//! assert_eq!(Money::from_decimal(0.75), Some(Money::from_cents(75)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

/// Largest distance from a whole cent still treated as float noise.
const SUB_CENT_TOLERANCE: f64 = 1e-6;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// Serialized as a plain integer of cents. Catalog fields that must stay
/// decimal in JSON use [`decimal`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use fireside_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount (as found in the catalog JSON) to cents.
    ///
    /// Returns `None` for NaN, infinities, values outside the i64 range and
    /// amounts with digits below the cent, so converting back with
    /// [`Money::to_decimal`] gives the same number.
    ///
    /// ```rust
    /// use fireside_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(12.0), Some(Money::from_cents(1200)));
    /// assert_eq!(Money::from_decimal(0.29), Some(Money::from_cents(29)));
    /// assert_eq!(Money::from_decimal(12.345), None);
    /// assert_eq!(Money::from_decimal(f64::NAN), None);
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let scaled = amount * 100.0;
        let cents = scaled.round();
        // Binary floats put 0.29 at 28.999999999999996 cents; 12.345 is a real half cent
        if (scaled - cents).abs() > SUB_CENT_TOLERANCE {
            return None;
        }
        if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Returns the value as a decimal number of dollars.
    ///
    /// Only for writing catalog JSON back out. Never do math on the result.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value in minor units for the payment provider.
    ///
    /// Same number as [`Money::cents`]; the name marks the provider boundary.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Subtracts `other`, stopping at zero.
    ///
    /// ```rust
    /// use fireside_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(1000);
    /// assert_eq!(subtotal.saturating_sub_to_zero(Money::from_cents(1500)), Money::zero());
    /// assert_eq!(subtotal.saturating_sub_to_zero(Money::from_cents(250)).cents(), 750);
    /// ```
    #[inline]
    pub fn saturating_sub_to_zero(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }

    /// Adds `other`, or `None` if the result leaves the i64 range.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Multiplies by a quantity, or `None` if the result leaves the i64 range.
    ///
    /// ```rust
    /// use fireside_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(875).checked_mul(2), Some(Money::from_cents(1750)));
    /// assert_eq!(Money::from_cents(250).checked_mul(i64::MAX / 100), None);
    /// ```
    #[inline]
    pub const fn checked_mul(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Absolute value, saturating at `i64::MAX` cents.
    #[inline]
    pub const fn abs(self) -> Money {
        Money(self.0.saturating_abs())
    }

    /// Calculates tax on this amount, rounding half-up to the cent.
    ///
    /// ## Rounding
    /// Integer math: `(amount × bps + 5000) / 10000`. A tax of exactly half a
    /// cent rounds up, matching decimal `ROUND_HALF_UP` at two places.
    /// Negative amounts are rounded symmetrically (half away from zero).
    ///
    /// ```rust
    /// use fireside_core::money::Money;
    /// use fireside_core::types::TaxRate;
    ///
    /// // $30.00 at 8.5% = $2.55
    /// let tax = Money::from_cents(3000).calculate_tax(TaxRate::from_bps(850));
    /// assert_eq!(tax.cents(), 255);
    ///
    /// // $0.10 at 5% = 0.5 cents → 1 cent
    /// let tax = Money::from_cents(10).calculate_tax(TaxRate::from_bps(500));
    /// assert_eq!(tax.cents(), 1);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so large amounts times bps cannot overflow
        let raw = self.0 as i128 * rate.bps() as i128;
        let tax_cents = if raw >= 0 {
            (raw + 5000) / 10000
        } else {
            (raw - 5000) / 10000
        };
        Money::from_cents(tax_cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }
}

// =============================================================================
// Decimal Serde Adapter
// =============================================================================

/// Serde adapter that reads and writes [`Money`] as a decimal JSON number.
///
/// Used by the catalog, whose prices are hand-edited as `12.0` or `0.75`.
///
/// ```rust,ignore
/// #[derive(Serialize, Deserialize)]
/// struct Size {
///     name: String,
///     #[serde(with = "crate::money::decimal")]
///     price_delta: Money,
/// }
/// ```
pub mod decimal {
    use super::Money;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount).ok_or_else(|| {
            D::Error::custom(format!("{} is not a whole number of cents", amount))
        })
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as `$12.34` (debug and logs; the UI formats its own).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(3955)), "$39.55");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_from_decimal_menu_prices() {
        for (decimal, cents) in [(12.0, 1200), (1.5, 150), (0.75, 75), (2.5, 250), (7.0, 700)] {
            assert_eq!(Money::from_decimal(decimal), Some(Money::from_cents(cents)));
        }
    }

    #[test]
    fn test_from_decimal_binary_fractions() {
        // 0.29 * 100 is 28.999999999999996 in binary floating point
        assert_eq!(Money::from_decimal(0.29).map(|m| m.cents()), Some(29));
        assert_eq!(Money::from_decimal(19.99).map(|m| m.cents()), Some(1999));
        assert_eq!(Money::from_decimal(-3.0).map(|m| m.cents()), Some(-300));
    }

    #[test]
    fn test_from_decimal_rejects_non_finite() {
        assert_eq!(Money::from_decimal(f64::INFINITY), None);
        assert_eq!(Money::from_decimal(f64::NAN), None);
        assert_eq!(Money::from_decimal(1e300), None);
    }

    #[test]
    fn test_decimal_serde_adapter() {
        #[derive(Serialize, Deserialize, PartialEq, Debug)]
        struct Priced {
            #[serde(with = "decimal")]
            price: Money,
        }

        let parsed: Priced = serde_json::from_str(r#"{"price": 0.75}"#).unwrap();
        assert_eq!(parsed.price.cents(), 75);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), r#"{"price":0.75}"#);

        let whole: Priced = serde_json::from_str(r#"{"price": 12}"#).unwrap();
        assert_eq!(whole.price.cents(), 1200);

        assert!(serde_json::from_str::<Priced>(r#"{"price": "12.00"}"#).is_err());
        assert!(serde_json::from_str::<Priced>(r#"{"price": 12.345}"#).is_err());
    }

    #[test]
    fn test_plain_serde_is_cents() {
        assert_eq!(serde_json::to_string(&Money::from_cents(3955)).unwrap(), "3955");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_saturating_sub_to_zero() {
        let subtotal = Money::from_cents(1000);
        assert_eq!(subtotal.saturating_sub_to_zero(Money::from_cents(1001)), Money::zero());
        assert_eq!(subtotal.saturating_sub_to_zero(subtotal), Money::zero());
        assert_eq!(subtotal.saturating_sub_to_zero(Money::zero()), subtotal);
    }

    #[test]
    fn test_tax_calculation_basic() {
        let tax = Money::from_cents(3000).calculate_tax(TaxRate::from_bps(850));
        assert_eq!(tax.cents(), 255);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 1000 × 825 / 10000 = 82.5 cents
        let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax.cents(), 83);

        // 1300 × 850 / 10000 = 110.5 cents; half-to-even would give 110
        let tax = Money::from_cents(1300).calculate_tax(TaxRate::from_bps(850));
        assert_eq!(tax.cents(), 111);
    }

    #[test]
    fn test_tax_below_half_cent_rounds_down() {
        // 1 cent at 8.5% = 0.085 cents
        let tax = Money::from_cents(1).calculate_tax(TaxRate::from_bps(850));
        assert_eq!(tax.cents(), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert!(!negative.is_positive());
    }

    #[test]
    fn test_from_decimal_rejects_sub_cent_digits() {
        assert_eq!(Money::from_decimal(12.345), None);
        assert_eq!(Money::from_decimal(0.125), None);
        assert_eq!(Money::from_decimal(3.0001), None);
        assert_eq!(Money::from_decimal(1234.56), Some(Money::from_cents(123456)));
    }

    #[test]
    fn test_to_decimal_inverts_from_decimal() {
        for cents in [0, 29, 75, 1999, 123456, -150] {
            let money = Money::from_cents(cents);
            assert_eq!(Money::from_decimal(money.to_decimal()), Some(money));
        }
    }

    #[test]
    fn test_checked_arithmetic() {
        let unit = Money::from_cents(875);
        assert_eq!(unit.checked_mul(2), Some(Money::from_cents(1750)));
        assert_eq!(unit.checked_add(unit), Some(Money::from_cents(1750)));

        assert_eq!(Money::from_cents(250).checked_mul(i64::MAX / 100), None);
        assert_eq!(Money::from_cents(1000).checked_add(Money::from_cents(i64::MAX)), None);
        assert_eq!(
            Money::from_cents(1000).saturating_sub_to_zero(Money::from_cents(i64::MIN)),
            Money::from_cents(i64::MAX)
        );
    }

    #[test]
    fn test_tax_on_extreme_amount_does_not_wrap() {
        let tax = Money::from_cents(i64::MAX).calculate_tax(TaxRate::from_bps(10_000));
        assert_eq!(tax, Money::from_cents(i64::MAX));
    }
}

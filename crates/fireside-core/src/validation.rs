//! # Validation Module
//!
//! Input rules applied by the command layer before anything is priced or
//! written.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Presentation layer                                            │
//! │  └── number inputs with min=0, required fields                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: fireside-desk commands                                        │
//! │  └── THIS MODULE: adjustments, phone numbers, charge amounts           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                        │
//! │  └── NOT NULL, UNIQUE(phone), CHECK(qty >= 1)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest customer name accepted.
pub const MAX_NAME_LEN: usize = 100;

/// Longest phone number accepted, formatting included.
pub const MAX_PHONE_LEN: usize = 20;

/// Longest free-text note accepted.
pub const MAX_NOTES_LEN: usize = 500;

/// Ceiling for any single amount: a catalog price, a line, an adjustment.
pub const MAX_AMOUNT: Money = Money::from_cents(100_000_000);

// =============================================================================
// Text Validators
// =============================================================================

/// Trims optional free text, turning blank input into `None`.
///
/// ```rust
/// use fireside_core::validation::optional_text;
///
/// assert_eq!(optional_text(Some("  Ana ")), Some("Ana".to_string()));
/// assert_eq!(optional_text(Some("   ")), None);
/// assert_eq!(optional_text(None), None);
/// ```
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validates an optional text field against a maximum length.
pub fn validate_optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> ValidationResult<Option<String>> {
    let value = optional_text(value);
    if let Some(ref v) = value {
        if v.chars().count() > max {
            return Err(ValidationError::TooLong {
                field: field.to_string(),
                max,
            });
        }
    }
    Ok(value)
}

/// Validates an optional phone number.
///
/// ## Rules
/// - Blank means no phone (the order is not linked to a customer)
/// - Digits plus `+ - ( ) .` and spaces, at least one digit
/// - At most [`MAX_PHONE_LEN`] characters
pub fn validate_phone(phone: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(phone) = validate_optional_text("phone", phone, MAX_PHONE_LEN)? else {
        return Ok(None);
    };

    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | '.' | ' ');
    if !phone.chars().all(allowed) || !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain digits and only + - ( ) . or spaces".to_string(),
        });
    }

    Ok(Some(phone))
}

// =============================================================================
// Money Validators
// =============================================================================

/// Validates a discount, delivery fee or tip: zero up to [`MAX_AMOUNT`].
///
/// ```rust
/// use fireside_core::money::Money;
/// use fireside_core::validation::validate_adjustment;
///
/// assert!(validate_adjustment("tip", Money::from_cents(0)).is_ok());
/// assert!(validate_adjustment("tip", Money::from_cents(-1)).is_err());
/// assert!(validate_adjustment("tip", Money::from_cents(i64::MAX)).is_err());
/// ```
pub fn validate_adjustment(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::negative(field));
    }
    validate_ceiling(field, amount)
}

/// Validates that an amount of either sign stays within [`MAX_AMOUNT`].
pub fn validate_ceiling(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.abs() > MAX_AMOUNT {
        return Err(ValidationError::too_large(field, MAX_AMOUNT));
    }
    Ok(())
}

/// Validates an amount about to be charged through the payment provider.
///
/// ## Rules
/// - Must be positive; a zero total has nothing to charge
pub fn validate_charge_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "charge amount".to_string(),
        });
    }
    Ok(())
}

/// Validates a tax rate in basis points: 0% to 100%.
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::InvalidFormat {
            field: "tax_rate".to_string(),
            reason: format!("{} bps is above 100%", bps),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone() {
        assert_eq!(validate_phone(None).unwrap(), None);
        assert_eq!(validate_phone(Some("  ")).unwrap(), None);
        assert_eq!(
            validate_phone(Some(" (555) 010-2030 ")).unwrap(),
            Some("(555) 010-2030".to_string())
        );
        assert!(validate_phone(Some("call me")).is_err());
        assert!(validate_phone(Some("---")).is_err());
        assert!(validate_phone(Some(&"1".repeat(21))).is_err());
    }

    #[test]
    fn test_validate_optional_text() {
        assert_eq!(
            validate_optional_text("notes", Some(" no onions "), MAX_NOTES_LEN).unwrap(),
            Some("no onions".to_string())
        );
        assert!(validate_optional_text("name", Some(&"a".repeat(101)), MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_validate_adjustment() {
        assert!(validate_adjustment("discount", Money::from_cents(500)).is_ok());
        assert!(validate_adjustment("discount", Money::zero()).is_ok());
        let err = validate_adjustment("delivery fee", Money::from_cents(-300)).unwrap_err();
        assert_eq!(err.to_string(), "delivery fee must not be negative");

        assert!(validate_adjustment("tip", MAX_AMOUNT).is_ok());
        let err = validate_adjustment("tip", Money::from_cents(i64::MAX)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { max, .. } if max == MAX_AMOUNT));
    }

    #[test]
    fn test_validate_ceiling_applies_to_both_signs() {
        assert!(validate_ceiling("price_delta", Money::from_cents(-150)).is_ok());
        assert!(validate_ceiling("price_delta", Money::from_cents(-100_000_001)).is_err());
        assert!(validate_ceiling("price_delta", Money::from_cents(i64::MIN)).is_err());
    }

    #[test]
    fn test_validate_charge_amount() {
        assert!(validate_charge_amount(Money::from_cents(1)).is_ok());
        assert!(validate_charge_amount(Money::zero()).is_err());
        assert!(validate_charge_amount(Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(850).is_ok());
        assert!(validate_tax_rate_bps(10_000).is_ok());
        assert!(validate_tax_rate_bps(10_001).is_err());
    }
}

//! # API Error Type
//!
//! Unified error type for desk commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Presentation layer            Desk commands                            │
//! │  ──────────────────            ─────────────                            │
//! │                                                                         │
//! │  place_order(form)                                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │                                                                  │  │
//! │  │  CoreError / ValidationError ──► VALIDATION_ERROR / NOT_FOUND    │  │
//! │  │  DbError / CatalogError      ──► STORAGE_ERROR / NOT_FOUND       │  │
//! │  │  PaymentError                ──► CONFIG_ERROR / GATEWAY_ERROR    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  { "code": "GATEWAY_ERROR", "message": "Payment provider error: ..." } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::error;

use fireside_core::{CoreError, ValidationError};
use fireside_db::{CatalogError, DbError};
use fireside_payments::PaymentError;

/// Error returned from desk commands.
///
/// ```json
/// { "code": "NOT_FOUND", "message": "Order not found: 42" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or invalid credentials, base URL or config file
    ConfigError,

    /// Rejected input: catalog edit, amounts, cart limits
    ValidationError,

    /// Persistence failed
    StorageError,

    /// Payment provider failed or refused
    GatewayError,

    /// Unknown order, order item or menu item
    NotFound,

    /// Anything else
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ConfigError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { .. } | DbError::CheckViolation { .. } => {
                ApiError::validation(err.to_string())
            }
            other => {
                // Details stay in the log
                error!(error = %other, "Storage operation failed");
                ApiError::new(ErrorCode::StorageError, "Storage operation failed")
            }
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Invalid(e) => ApiError::validation(e.to_string()),
            CatalogError::Write { .. } => {
                error!(error = %err, "Catalog write failed");
                ApiError::new(ErrorCode::StorageError, err.to_string())
            }
            CatalogError::Seed { .. } | CatalogError::Read { .. } => ApiError::config(err.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotFound(id) => ApiError::not_found("Menu item", id),
            CoreError::LineNotFound(index) => ApiError::not_found("Cart line", index),
            CoreError::EmptyCart
            | CoreError::CartTooLarge { .. }
            | CoreError::QuantityTooLarge { .. } => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        if err.is_config_error() {
            return ApiError::config(err.to_string());
        }
        match err {
            PaymentError::NothingToCharge(_) => ApiError::validation(err.to_string()),
            PaymentError::Storage(e) => ApiError::from(e),
            other => ApiError::new(ErrorCode::GatewayError, other.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use fireside_core::Money;

    #[test]
    fn test_serializes_screaming_codes() {
        let json = serde_json::to_value(ApiError::not_found("Order", 42)).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Order not found: 42");
    }

    #[test]
    fn test_payment_errors_map_to_taxonomy() {
        assert_eq!(
            ApiError::from(PaymentError::NotConfigured("STRIPE_SECRET_KEY")).code,
            ErrorCode::ConfigError
        );
        assert_eq!(
            ApiError::from(PaymentError::NothingToCharge(Money::zero())).code,
            ErrorCode::ValidationError
        );
        let err = ApiError::from(PaymentError::Gateway {
            status: Some(402),
            message: "Your card was declined.".into(),
        });
        assert_eq!(err.code, ErrorCode::GatewayError);
        assert!(err.message.contains("Your card was declined."));
    }

    #[test]
    fn test_storage_details_are_hidden() {
        let err = ApiError::from(DbError::QueryFailed("near \"SELEC\": syntax error".into()));
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(!err.message.contains("SELEC"));
        assert_eq!(ApiError::from(DbError::not_found("Order", 7)).code, ErrorCode::NotFound);
    }

    #[test]
    fn test_catalog_errors() {
        let invalid = CatalogError::Invalid(ValidationError::required("id"));
        assert_eq!(ApiError::from(invalid).code, ErrorCode::ValidationError);
    }
}

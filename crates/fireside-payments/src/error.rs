//! # Payment Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Validation    │  │       Gateway           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NotConfigured  │  │  NothingToCharge│  │  Gateway (API answer)   │ │
//! │  │  InvalidBaseUrl │  │                 │  │  Transport (no answer)  │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────────────┐  ┌─────────────────────────────────┐  │
//! │  │  Webhook (HTTP 400)         │  │  Storage                        │  │
//! │  │                             │  │                                 │  │
//! │  │  MissingSignature           │  │  Storage(DbError)               │  │
//! │  │  SignatureMismatch          │  │                                 │  │
//! │  │  StaleSignature             │  │                                 │  │
//! │  │  MalformedPayload           │  │                                 │  │
//! │  └─────────────────────────────┘  └─────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use fireside_core::Money;
use fireside_db::DbError;
use thiserror::Error;

/// Result type alias for payment operations.
pub type PaymentResult<T> = Result<T, PaymentError>;

#[derive(Debug, Error)]
pub enum PaymentError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// A required setting is missing. Carries the environment variable name.
    #[error("Payments not configured: {0} is not set")]
    NotConfigured(&'static str),

    /// The public base URL or the provider API base is not a usable URL.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    /// Checkout requested for a zero or negative total.
    #[error("Nothing to charge: order total is {0}")]
    NothingToCharge(Money),

    // =========================================================================
    // Gateway Errors
    // =========================================================================
    /// The provider answered with an error.
    #[error("Payment provider error: {message}")]
    Gateway { status: Option<u16>, message: String },

    /// The provider could not be reached or the answer could not be read.
    #[error("Payment provider unreachable: {0}")]
    Transport(String),

    // =========================================================================
    // Webhook Errors
    // =========================================================================
    #[error("Missing Stripe-Signature header")]
    MissingSignature,

    #[error("Webhook signature mismatch")]
    SignatureMismatch,

    /// Signed too long ago (or too far in the future).
    #[error("Webhook timestamp outside tolerance ({age_secs}s)")]
    StaleSignature { age_secs: i64 },

    #[error("Malformed webhook payload: {0}")]
    MalformedPayload(String),

    // =========================================================================
    // Storage Errors
    // =========================================================================
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl PaymentError {
    /// Missing or unusable settings.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PaymentError::NotConfigured(_) | PaymentError::InvalidBaseUrl(_)
        )
    }

    /// Rejected input, nothing was sent anywhere.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, PaymentError::NothingToCharge(_))
    }

    /// Webhook requests that must be answered with 400.
    pub fn is_rejected_webhook(&self) -> bool {
        matches!(
            self,
            PaymentError::MissingSignature
                | PaymentError::SignatureMismatch
                | PaymentError::StaleSignature { .. }
                | PaymentError::MalformedPayload(_)
        )
    }
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        PaymentError::Transport(err.to_string())
    }
}

impl From<url::ParseError> for PaymentError {
    fn from(err: url::ParseError) -> Self {
        PaymentError::InvalidBaseUrl(err.to_string())
    }
}

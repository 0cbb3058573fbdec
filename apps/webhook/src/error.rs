//! Error types for the webhook receiver.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use fireside_payments::PaymentError;

/// Why a delivery was not acknowledged.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The receiver cannot verify anything yet.
    #[error("Webhook secret not configured")]
    NotConfigured,

    /// Bad or missing signature, stale timestamp, unreadable body.
    #[error("Rejected delivery: {0}")]
    Rejected(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PaymentError> for WebhookError {
    fn from(error: PaymentError) -> Self {
        if error.is_config_error() {
            WebhookError::NotConfigured
        } else if error.is_rejected_webhook() {
            WebhookError::Rejected(error.to_string())
        } else {
            WebhookError::Internal(error.to_string())
        }
    }
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::Rejected(_) => StatusCode::BAD_REQUEST,
            WebhookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_errors_map_to_status() {
        let missing: WebhookError = PaymentError::NotConfigured("STRIPE_WEBHOOK_SECRET").into();
        assert_eq!(missing.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bad: WebhookError = PaymentError::SignatureMismatch.into();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let stale: WebhookError = PaymentError::StaleSignature { age_secs: 900 }.into();
        assert_eq!(stale.status(), StatusCode::BAD_REQUEST);

        let gateway: WebhookError = PaymentError::Transport("reset".into()).into();
        assert_eq!(gateway.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

//! HTTP handlers.
//!
//! ## Delivery Handling
//! ```text
//! POST /webhook (raw body + Stripe-Signature)
//!      │
//!      ├─ secret unset ─────────────────────────────► 500
//!      ├─ signature missing / wrong / stale ────────► 400
//!      ├─ body not an event ────────────────────────► 400
//!      │
//!      ▼  authentic
//! Reconciler::reconcile(VerifiedEvent)
//!      │  marked paid / already paid / unknown order /
//!      │  irrelevant type / storage failure (logged)
//!      ▼
//!     200 "ok"
//! ```
//! Authentic deliveries are always acknowledged so the provider stops
//! retrying; a repeat delivery is a no-op thanks to `set_paid`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::WebhookError;
use crate::AppState;
use fireside_payments::webhook::SIGNATURE_HEADER;
use fireside_payments::VerifiedEvent;

/// Receives one provider event.
///
/// Must receive the raw body (not JSON) for signature verification.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, WebhookError> {
    let secret = state.payments.require_webhook_secret().map_err(|e| {
        error!("Webhook delivery received but STRIPE_WEBHOOK_SECRET is not set");
        WebhookError::from(e)
    })?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let event = VerifiedEvent::from_request(&body, signature, secret, Utc::now()).map_err(|e| {
        warn!(error = %e, "Webhook delivery rejected");
        WebhookError::from(e)
    })?;

    info!(
        event_id = %event.event().id,
        event_type = %event.event().event_type,
        "Received webhook event"
    );

    match state.reconciler().reconcile(&event).await {
        Ok(outcome) => info!(event_id = %event.event().id, ?outcome, "Webhook event handled"),
        Err(e) => error!(event_id = %event.event().id, error = %e, "Webhook event could not be applied"),
    }

    Ok("ok")
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
}

/// Liveness plus database reachability.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = state.db.health_check().await;
    let (code, status) = if database {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    (code, Json(HealthResponse { status, database }))
}

#[cfg(test)]
mod tests {
    use crate::{router, AppState};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use chrono::Utc;
    use fireside_core::{Money, NewOrder, OrderId, ServiceType, Totals};
    use fireside_db::{Database, DbConfig};
    use fireside_payments::webhook::signature_header;
    use fireside_payments::PaymentConfig;
    use tower::ServiceExt;

    const SECRET: &str = "whsec_router";

    async fn state_with_secret(secret: Option<&str>) -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let payments = PaymentConfig {
            webhook_secret: secret.map(str::to_string),
            ..PaymentConfig::default()
        };
        AppState::new(db, payments)
    }

    async fn place(state: &AppState) -> OrderId {
        let order = NewOrder {
            customer_name: Some("Webhook".into()),
            customer_phone: None,
            service_type: ServiceType::Takeout,
            table_number: None,
            payment_method: Some("Card (Stripe)".into()),
            notes: None,
            source: "POS".into(),
            totals: Totals {
                subtotal: Money::from_cents(1800),
                total: Money::from_cents(1800),
                ..Totals::default()
            },
        };
        state.db.orders().create_order(&order, &[]).await.unwrap()
    }

    fn event(event_type: &str, order_id: &str) -> Vec<u8> {
        serde_json::json!({
            "id": "evt_router",
            "type": event_type,
            "data": { "object": { "id": "cs_test_1", "metadata": { "order_id": order_id } } }
        })
        .to_string()
        .into_bytes()
    }

    fn delivery(body: Vec<u8>, signature: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/webhook");
        if let Some(signature) = signature {
            builder = builder.header("Stripe-Signature", signature);
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn signed(body: Vec<u8>) -> Request<Body> {
        let header = signature_header(&body, SECRET, Utc::now().timestamp()).unwrap();
        delivery(body, Some(header))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn test_signed_event_marks_order_paid_once() {
        let state = state_with_secret(Some(SECRET)).await;
        let id = place(&state).await;
        let app = router(state.clone());

        let body = event("checkout.session.completed", &id.to_string());
        assert_eq!(send(&app, signed(body.clone())).await, (StatusCode::OK, "ok".to_string()));

        let order = state.db.orders().require(id).await.unwrap();
        assert!(order.paid);
        let first_paid_at = order.paid_at;

        // Provider retry
        assert_eq!(send(&app, signed(body)).await.0, StatusCode::OK);
        let order = state.db.orders().require(id).await.unwrap();
        assert!(order.paid);
        assert_eq!(order.paid_at, first_paid_at);
    }

    #[tokio::test]
    async fn test_payment_intent_path_and_alias_route() {
        let state = state_with_secret(Some(SECRET)).await;
        let id = place(&state).await;
        let app = router(state.clone());

        let body = event("payment_intent.succeeded", &id.to_string());
        let header = signature_header(&body, SECRET, Utc::now().timestamp()).unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/stripe/webhook")
            .header("stripe-signature", header)
            .body(Body::from(body))
            .unwrap();

        assert_eq!(send(&app, request).await.0, StatusCode::OK);
        assert!(state.db.orders().require(id).await.unwrap().paid);
    }

    #[tokio::test]
    async fn test_rejected_deliveries_change_nothing() {
        let state = state_with_secret(Some(SECRET)).await;
        let id = place(&state).await;
        let app = router(state.clone());
        let body = event("checkout.session.completed", &id.to_string());

        let (status, _) = send(&app, delivery(body.clone(), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let forged = signature_header(&body, "whsec_other", Utc::now().timestamp()).unwrap();
        let (status, _) = send(&app, delivery(body.clone(), Some(forged))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let stale = signature_header(&body, SECRET, Utc::now().timestamp() - 3600).unwrap();
        let (status, _) = send(&app, delivery(body, Some(stale))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, signed(b"not json".to_vec())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert!(!state.db.orders().require(id).await.unwrap().paid);
    }

    #[tokio::test]
    async fn test_unset_secret_is_server_error() {
        let state = state_with_secret(None).await;
        let app = router(state);

        let (status, _) = send(&app, signed(event("checkout.session.completed", "1"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_authentic_but_unusable_events_are_acknowledged() {
        let state = state_with_secret(Some(SECRET)).await;
        let app = router(state.clone());

        for body in [
            event("checkout.session.completed", "4242"),
            event("checkout.session.completed", "admin-test"),
            event("customer.created", "1"),
        ] {
            assert_eq!(send(&app, signed(body)).await.0, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_storage_failure_is_acknowledged() {
        let state = state_with_secret(Some(SECRET)).await;
        let id = place(&state).await;
        let app = router(state.clone());
        state.db.close().await;

        let body = event("checkout.session.completed", &id.to_string());
        assert_eq!(send(&app, signed(body)).await.0, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_reports_database() {
        let state = state_with_secret(None).await;
        let app = router(state.clone());
        let request = || Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, body) = send(&app, request()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"database\":true"));

        state.db.close().await;
        let (status, body) = send(&app, request()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("\"database\":false"));
    }
}

//! Stripe Checkout over the REST API (no SDK dependency).
//!
//! One line item carries the whole order total; itemisation stays in the
//! order store. The order id rides along as `metadata[order_id]` on both
//! the session and its payment intent so either webhook event can be
//! correlated.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use super::{CheckoutRequest, CheckoutSession, PaymentGateway, PaymentStatus, SessionStatus};
use crate::config::PaymentConfig;
use crate::error::{PaymentError, PaymentResult};
use crate::return_url::ReturnUrls;

const USER_AGENT: &str = concat!("fireside-pos/", env!("CARGO_PKG_VERSION"));

/// Stripe-backed [`PaymentGateway`].
pub struct StripeGateway {
    config: PaymentConfig,
    client: Client,
}

impl StripeGateway {
    /// Never fails for missing credentials; those surface per call.
    pub fn new(config: PaymentConfig) -> PaymentResult<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(StripeGateway { config, client })
    }

    pub fn config(&self) -> &PaymentConfig {
        &self.config
    }

    fn endpoint(&self, segments: &[&str]) -> PaymentResult<Url> {
        let mut url = self.config.api_base_url()?;
        url.path_segments_mut()
            .map_err(|_| PaymentError::InvalidBaseUrl(self.config.api_base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout(&self, request: &CheckoutRequest) -> PaymentResult<CheckoutSession> {
        let secret_key = self.config.require_secret_key()?;
        request.validate()?;
        let urls = ReturnUrls::for_order(&self.config.return_base_url()?, request.order_id);

        let order_id = request.order_id.to_string();
        let unit_amount = request.amount.minor_units().to_string();
        let form = [
            ("mode", "payment"),
            ("line_items[0][price_data][currency]", self.config.currency.as_str()),
            ("line_items[0][price_data][product_data][name]", request.label.as_str()),
            ("line_items[0][price_data][unit_amount]", unit_amount.as_str()),
            ("line_items[0][quantity]", "1"),
            ("success_url", urls.success.as_str()),
            ("cancel_url", urls.cancel.as_str()),
            ("metadata[order_id]", order_id.as_str()),
            ("payment_intent_data[metadata][order_id]", order_id.as_str()),
        ];

        debug!(order_id = request.order_id, amount = %request.amount, "Creating checkout session");

        let response = self
            .client
            .post(self.endpoint(&["v1", "checkout", "sessions"])?)
            .basic_auth(secret_key, None::<&str>)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .form(&form)
            .send()
            .await?;
        let body = read_body(response).await?;

        let session_id = required_str(&body, "id")?;
        let url = required_str(&body, "url")?;

        info!(order_id = request.order_id, session_id = %session_id, "Checkout session created");

        Ok(CheckoutSession { url, session_id })
    }

    async fn retrieve_status(&self, session_id: &str) -> PaymentResult<SessionStatus> {
        let secret_key = self.config.require_secret_key()?;

        let response = self
            .client
            .get(self.endpoint(&["v1", "checkout", "sessions", session_id])?)
            .basic_auth(secret_key, None::<&str>)
            .send()
            .await?;
        let body = read_body(response).await?;

        let status = body["payment_status"]
            .as_str()
            .map(PaymentStatus::from_provider)
            .ok_or_else(|| missing_field("payment_status"))?;

        Ok(SessionStatus {
            session_id: body["id"].as_str().unwrap_or(session_id).to_string(),
            status,
            order_id: body["metadata"]["order_id"].as_str().map(String::from),
        })
    }
}

/// JSON body of a 2xx answer, or the provider's `error.message`.
async fn read_body(response: Response) -> PaymentResult<Value> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(String::from))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        warn!(status = status.as_u16(), message = %message, "Payment provider rejected request");
        return Err(PaymentError::Gateway {
            status: Some(status.as_u16()),
            message,
        });
    }

    serde_json::from_str(&text).map_err(|e| PaymentError::Gateway {
        status: Some(status.as_u16()),
        message: format!("unreadable response: {}", e),
    })
}

fn required_str(body: &Value, field: &'static str) -> PaymentResult<String> {
    body[field]
        .as_str()
        .map(String::from)
        .ok_or_else(|| missing_field(field))
}

fn missing_field(field: &str) -> PaymentError {
    PaymentError::Gateway {
        status: None,
        message: format!("response has no {}", field),
    }
}

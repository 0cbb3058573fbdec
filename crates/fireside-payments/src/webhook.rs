//! # Webhook Signatures and Events
//!
//! The provider signs each delivery with the shared webhook secret:
//!
//! ```text
//! Stripe-Signature: t=1700000000,v1=5257a869e7...,v1=...
//!
//! expected = hex(HMAC-SHA256(secret, "{t}.{raw body}"))
//! ```
//!
//! A delivery is authentic when any `v1` entry matches and `t` lies within
//! [`TOLERANCE_SECS`] of the local clock. Nothing in the body is read before
//! that check passes.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;

use crate::error::{PaymentError, PaymentResult};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature (lowercase, as HTTP/2 delivers it).
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Maximum clock distance between signing and verification.
pub const TOLERANCE_SECS: i64 = 300;

/// Event types that confirm a payment.
pub const PAYMENT_EVENTS: [&str; 2] = ["checkout.session.completed", "payment_intent.succeeded"];

/// Checks `header` against `payload` and `secret` as of `now`.
pub fn verify_signature(
    payload: &[u8],
    header: Option<&str>,
    secret: &str,
    now: DateTime<Utc>,
) -> PaymentResult<()> {
    let header = header
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or(PaymentError::MissingSignature)?;

    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", t)) => timestamp = Some(t),
            Some(("v1", v)) => signatures.push(v),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(PaymentError::SignatureMismatch)?;
    if signatures.is_empty() {
        return Err(PaymentError::SignatureMismatch);
    }
    let signed_at: i64 = timestamp.parse().map_err(|_| PaymentError::SignatureMismatch)?;

    let mac = signed_mac(payload, timestamp, secret)?;
    let matched = signatures.iter().any(|sig| {
        hex::decode(sig)
            .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });
    if !matched {
        return Err(PaymentError::SignatureMismatch);
    }

    let age_secs = now.timestamp() - signed_at;
    if age_secs.abs() > TOLERANCE_SECS {
        return Err(PaymentError::StaleSignature { age_secs });
    }

    Ok(())
}

/// Verifies the delivery, then parses it.
pub fn construct_event(
    payload: &[u8],
    header: Option<&str>,
    secret: &str,
    now: DateTime<Utc>,
) -> PaymentResult<WebhookEvent> {
    verify_signature(payload, header, secret, now)?;
    serde_json::from_slice(payload).map_err(|e| PaymentError::MalformedPayload(e.to_string()))
}

/// Produces a valid `Stripe-Signature` value, for local tooling and tests.
pub fn signature_header(payload: &[u8], secret: &str, timestamp: i64) -> PaymentResult<String> {
    let t = timestamp.to_string();
    let mac = signed_mac(payload, &t, secret)?;
    Ok(format!("t={},v1={}", t, hex::encode(mac.finalize().into_bytes())))
}

fn signed_mac(payload: &[u8], timestamp: &str, secret: &str) -> PaymentResult<HmacSha256> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| PaymentError::SignatureMismatch)?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// The parts of a provider event this system reads.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: Value,
}

impl WebhookEvent {
    pub fn is_payment_event(&self) -> bool {
        PAYMENT_EVENTS.contains(&self.event_type.as_str())
    }

    /// `data.object.metadata.order_id`, if present and non-blank.
    pub fn metadata_order_id(&self) -> Option<String> {
        let value = &self.data.object["metadata"]["order_id"];
        let raw = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!raw.is_empty()).then_some(raw)
    }
}

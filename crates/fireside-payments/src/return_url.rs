//! # Checkout Return URLs
//!
//! After checkout the provider redirects the customer's browser back to the
//! desk with the outcome in the query string:
//!
//! ```text
//! {base}?checkout=success&order_id=42&session_id={CHECKOUT_SESSION_ID}
//! {base}?checkout=canceled&order_id=42
//! ```
//!
//! The provider replaces `{CHECKOUT_SESSION_ID}` with the real session id.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use fireside_core::OrderId;

/// Replaced by the provider with the session id on redirect.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Success and cancel URLs for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnUrls {
    pub success: String,
    pub cancel: String,
}

impl ReturnUrls {
    /// `base` must already be cleaned (see `PaymentConfig::return_base_url`).
    pub fn for_order(base: &str, order_id: OrderId) -> Self {
        ReturnUrls {
            success: format!(
                "{}?checkout=success&order_id={}&session_id={}",
                base, order_id, SESSION_ID_PLACEHOLDER
            ),
            cancel: format!("{}?checkout=canceled&order_id={}", base, order_id),
        }
    }
}

/// The `checkout` indicator of a return request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutOutcome {
    Success,
    Canceled,
}

/// Correlation parameters of a return request, as received.
///
/// `order_id` stays a string: test checkouts created from the provider
/// dashboard carry ids the store has never seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnParams {
    pub checkout: Option<CheckoutOutcome>,
    pub order_id: Option<String>,
    pub session_id: Option<String>,
}

impl ReturnParams {
    /// Parses a query string, with or without the leading `?`.
    ///
    /// Unknown keys are ignored; the first occurrence of a key wins.
    ///
    /// ```rust
    /// use fireside_payments::return_url::{CheckoutOutcome, ReturnParams};
    ///
    /// let params = ReturnParams::from_query("?checkout=success&order_id=7&session_id=cs_1");
    /// assert_eq!(params.checkout, Some(CheckoutOutcome::Success));
    /// assert_eq!(params.order_id.as_deref(), Some("7"));
    /// ```
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = ReturnParams::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "checkout" if params.checkout.is_none() => {
                    params.checkout = match value {
                        "success" => Some(CheckoutOutcome::Success),
                        "canceled" | "cancelled" => Some(CheckoutOutcome::Canceled),
                        _ => None,
                    };
                }
                "order_id" if params.order_id.is_none() => params.order_id = Some(value.to_string()),
                "session_id" if params.session_id.is_none() => {
                    params.session_id = Some(value.to_string())
                }
                _ => {}
            }
        }

        params
    }

    /// True when the request carries any checkout outcome at all.
    pub fn is_checkout_return(&self) -> bool {
        self.checkout.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_for_order() {
        let urls = ReturnUrls::for_order("https://pos.example.com", 42);
        assert_eq!(
            urls.success,
            "https://pos.example.com?checkout=success&order_id=42&session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(urls.cancel, "https://pos.example.com?checkout=canceled&order_id=42");
    }

    #[test]
    fn test_parse_success() {
        let params = ReturnParams::from_query("checkout=success&order_id=42&session_id=cs_test_a1");
        assert_eq!(params.checkout, Some(CheckoutOutcome::Success));
        assert_eq!(params.order_id.as_deref(), Some("42"));
        assert_eq!(params.session_id.as_deref(), Some("cs_test_a1"));
        assert!(params.is_checkout_return());
    }

    #[test]
    fn test_parse_cancel_and_noise() {
        let params = ReturnParams::from_query("?view=order&checkout=canceled&order_id=%2042%20");
        assert_eq!(params.checkout, Some(CheckoutOutcome::Canceled));
        assert_eq!(params.order_id.as_deref(), Some("42"));
        assert_eq!(params.session_id, None);
    }

    #[test]
    fn test_parse_without_checkout() {
        let params = ReturnParams::from_query("view=kitchen");
        assert!(!params.is_checkout_return());
        assert_eq!(ReturnParams::from_query(""), ReturnParams::default());
        assert_eq!(ReturnParams::from_query("checkout=maybe").checkout, None);
    }

    #[test]
    fn test_success_url_round_trips_through_parser() {
        let urls = ReturnUrls::for_order("http://localhost:8501", 9);
        let redirected = urls.success.replace(SESSION_ID_PLACEHOLDER, "cs_live_xyz");
        let query = redirected.split_once('?').map(|(_, q)| q).unwrap();
        let params = ReturnParams::from_query(query);
        assert_eq!(params.order_id.as_deref(), Some("9"));
        assert_eq!(params.session_id.as_deref(), Some("cs_live_xyz"));
    }
}

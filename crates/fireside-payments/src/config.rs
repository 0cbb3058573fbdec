//! # Payment Configuration
//!
//! Credentials and URLs for the payment provider.
//!
//! ## Lazy Validation
//! ```text
//! startup ──► PaymentConfig::from_env()      never fails
//!                  │
//!                  ▼
//! place_order ──► require_secret_key()       NotConfigured("STRIPE_SECRET_KEY")
//!                 return_base_url()          NotConfigured("PUBLIC_BASE_URL") / InvalidBaseUrl
//! webhook     ──► require_webhook_secret()   NotConfigured("STRIPE_WEBHOOK_SECRET")
//! ```
//! The desk runs without card payments configured; only the operations that
//! need a value complain about it.
//!
//! ## Environment
//! | Variable                | Field             |
//! |-------------------------|-------------------|
//! | `STRIPE_SECRET_KEY`     | `secret_key`      |
//! | `STRIPE_WEBHOOK_SECRET` | `webhook_secret`  |
//! | `PUBLIC_BASE_URL`       | `public_base_url` |
//! | `STRIPE_CURRENCY`       | `currency`        |
//! | `STRIPE_API_BASE`       | `api_base`        |

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{PaymentError, PaymentResult};

pub const DEFAULT_CURRENCY: &str = "usd";
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Payment provider settings.
///
/// `Debug` never prints the secrets.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub secret_key: Option<String>,
    pub webhook_secret: Option<String>,
    /// Where the provider sends the customer back after checkout.
    pub public_base_url: Option<String>,
    pub currency: String,
    pub api_base: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        PaymentConfig {
            secret_key: None,
            webhook_secret: None,
            public_base_url: None,
            currency: DEFAULT_CURRENCY.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("PaymentConfig")
            .field("secret_key", &redact(&self.secret_key))
            .field("webhook_secret", &redact(&self.webhook_secret))
            .field("public_base_url", &self.public_base_url)
            .field("currency", &self.currency)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl PaymentConfig {
    /// Defaults overridden by the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Applies `STRIPE_*` / `PUBLIC_BASE_URL` variables on top of the
    /// current values. Blank variables are ignored.
    pub fn apply_env_overrides(&mut self) {
        let var = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(key) = var("STRIPE_SECRET_KEY") {
            debug!("Using payment secret key from environment");
            self.secret_key = Some(key);
        }
        if let Some(secret) = var("STRIPE_WEBHOOK_SECRET") {
            debug!("Using webhook secret from environment");
            self.webhook_secret = Some(secret);
        }
        if let Some(base) = var("PUBLIC_BASE_URL") {
            debug!(public_base_url = %base, "Overriding public base URL from environment");
            self.public_base_url = Some(base);
        }
        if let Some(currency) = var("STRIPE_CURRENCY") {
            self.currency = currency.to_lowercase();
        }
        if let Some(api_base) = var("STRIPE_API_BASE") {
            debug!(api_base = %api_base, "Overriding provider API base from environment");
            self.api_base = api_base;
        }
    }

    /// True when card checkout can be attempted at all.
    pub fn is_configured(&self) -> bool {
        present(&self.secret_key).is_some()
    }

    pub fn require_secret_key(&self) -> PaymentResult<&str> {
        present(&self.secret_key).ok_or(PaymentError::NotConfigured("STRIPE_SECRET_KEY"))
    }

    pub fn require_webhook_secret(&self) -> PaymentResult<&str> {
        present(&self.webhook_secret).ok_or(PaymentError::NotConfigured("STRIPE_WEBHOOK_SECRET"))
    }

    /// The public base URL reduced to `scheme://host[:port]`.
    ///
    /// Path, query, fragment and trailing slashes are dropped; the return
    /// URLs always point at the root of the public host.
    ///
    /// ```rust
    /// use fireside_payments::PaymentConfig;
    ///
    /// let config = PaymentConfig {
    ///     public_base_url: Some("https://pos.example.com:8443/desk/?view=order#top".into()),
    ///     ..PaymentConfig::default()
    /// };
    /// assert_eq!(config.return_base_url().unwrap(), "https://pos.example.com:8443");
    /// ```
    pub fn return_base_url(&self) -> PaymentResult<String> {
        let raw = present(&self.public_base_url).ok_or(PaymentError::NotConfigured("PUBLIC_BASE_URL"))?;
        let mut url = Url::parse(raw)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PaymentError::InvalidBaseUrl(format!(
                "{} must use http or https",
                raw
            )));
        }
        url.set_path("");
        url.set_query(None);
        url.set_fragment(None);
        Ok(url.as_str().trim_end_matches('/').to_string())
    }

    /// Provider API base as a parsed URL.
    pub fn api_base_url(&self) -> PaymentResult<Url> {
        Ok(Url::parse(&self.api_base)?)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_base(base: &str) -> PaymentConfig {
        PaymentConfig {
            public_base_url: Some(base.to_string()),
            ..PaymentConfig::default()
        }
    }

    #[test]
    fn test_defaults_are_unconfigured() {
        let config = PaymentConfig::default();
        assert!(!config.is_configured());
        assert!(matches!(
            config.require_secret_key(),
            Err(PaymentError::NotConfigured("STRIPE_SECRET_KEY"))
        ));
        assert!(matches!(
            config.require_webhook_secret(),
            Err(PaymentError::NotConfigured("STRIPE_WEBHOOK_SECRET"))
        ));
        assert!(matches!(
            config.return_base_url(),
            Err(PaymentError::NotConfigured("PUBLIC_BASE_URL"))
        ));
        assert_eq!(config.currency, "usd");
    }

    #[test]
    fn test_blank_secret_is_missing() {
        let config = PaymentConfig {
            secret_key: Some("   ".into()),
            ..PaymentConfig::default()
        };
        assert!(config.require_secret_key().is_err());
    }

    #[test]
    fn test_return_base_url_cleanup() {
        assert_eq!(
            with_base("http://localhost:8501").return_base_url().unwrap(),
            "http://localhost:8501"
        );
        assert_eq!(
            with_base("https://pos.example.com///").return_base_url().unwrap(),
            "https://pos.example.com"
        );
        assert_eq!(
            with_base("https://pos.example.com/app/?checkout=success").return_base_url().unwrap(),
            "https://pos.example.com"
        );
        assert_eq!(
            with_base(" http://127.0.0.1:8502/pos/index.html#cart ").return_base_url().unwrap(),
            "http://127.0.0.1:8502"
        );
    }

    #[test]
    fn test_return_base_url_rejects_garbage() {
        assert!(matches!(
            with_base("not a url").return_base_url(),
            Err(PaymentError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            with_base("ftp://example.com").return_base_url(),
            Err(PaymentError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = PaymentConfig {
            secret_key: Some("sk_test_very_secret".into()),
            webhook_secret: Some("whsec_hidden".into()),
            ..PaymentConfig::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk_test_very_secret"));
        assert!(!printed.contains("whsec_hidden"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: PaymentConfig =
            serde_json::from_str(r#"{"public_base_url": "https://pos.example.com"}"#).unwrap();
        assert_eq!(config.public_base_url.as_deref(), Some("https://pos.example.com"));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.secret_key, None);
    }
}

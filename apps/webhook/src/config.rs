//! Webhook receiver configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                | Default        |
//! |-------------------------|----------------|
//! | `WEBHOOK_BIND`          | `0.0.0.0:8000` |
//! | `FIRESIDE_DB_PATH`      | required       |
//! | `STRIPE_WEBHOOK_SECRET` | unset (500s)   |

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use fireside_payments::PaymentConfig;

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,

    /// SQLite file shared with the desk
    pub database_path: PathBuf,

    /// Only the webhook secret is used here
    pub payments: PaymentConfig,
}

impl WebhookConfig {
    /// Load configuration from environment variables.
    ///
    /// A missing webhook secret is not an error here: the receiver starts
    /// and answers deliveries with 500 until it is set.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_addr = env::var("WEBHOOK_BIND")
            .unwrap_or_else(|_| DEFAULT_BIND.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("WEBHOOK_BIND".to_string()))?;

        let database_path = env::var("FIRESIDE_DB_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| ConfigError::MissingRequired("FIRESIDE_DB_PATH".to_string()))?;

        Ok(WebhookConfig {
            bind_addr,
            database_path,
            payments: PaymentConfig::from_env(),
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bind_parses() {
        let addr: SocketAddr = DEFAULT_BIND.parse().unwrap();
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::MissingRequired("FIRESIDE_DB_PATH".into()).to_string(),
            "Missing required configuration: FIRESIDE_DB_PATH"
        );
        assert_eq!(
            ConfigError::InvalidValue("WEBHOOK_BIND".into()).to_string(),
            "Invalid value for WEBHOOK_BIND"
        );
    }
}

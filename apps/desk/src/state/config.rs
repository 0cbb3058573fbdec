//! # Desk Configuration
//!
//! ## Load Order
//! ```text
//! defaults ──► desk.toml ──► FIRESIDE_* / STRIPE_* env ──► validate()
//! ```
//! The file lives in the platform config folder unless a path is given:
//! - **macOS**: `~/Library/Application Support/com.fireside.pos/desk.toml`
//! - **Windows**: `%APPDATA%\fireside\pos\config\desk.toml`
//! - **Linux**: `~/.config/pos/desk.toml`
//!
//! ## Example
//! ```toml
//! store_name = "Fireside Pizza"
//! tax_rate_bps = 850
//! delivery_fee_cents = 300
//!
//! [payments]
//! public_base_url = "https://pos.example.com"
//! ```
//!
//! Payment credentials are best left to the environment; they are checked
//! only when a card checkout is attempted.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use fireside_core::validation::{validate_adjustment, validate_tax_rate_bps};
use fireside_core::{Money, TaxRate, APP_NAME, DEFAULT_DELIVERY_FEE_CENTS, DEFAULT_TAX_RATE_BPS};
use fireside_payments::PaymentConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Shown on the desk header and reports.
    pub store_name: String,

    pub currency_symbol: String,

    /// Default tax rate in basis points (850 = 8.5%).
    pub tax_rate_bps: u32,

    /// Default delivery fee in cents.
    pub delivery_fee_cents: i64,

    /// SQLite file. Platform data folder when unset.
    pub database_path: Option<PathBuf>,

    /// Catalog JSON. Next to the database when unset.
    pub catalog_path: Option<PathBuf>,

    pub payments: PaymentConfig,
}

impl Default for DeskConfig {
    fn default() -> Self {
        DeskConfig {
            store_name: APP_NAME.to_string(),
            currency_symbol: "$".to_string(),
            tax_rate_bps: DEFAULT_TAX_RATE_BPS,
            delivery_fee_cents: DEFAULT_DELIVERY_FEE_CENTS,
            database_path: None,
            catalog_path: None,
            payments: PaymentConfig::default(),
        }
    }
}

impl DeskConfig {
    /// Loads configuration; see the module docs for the order.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading desk config from file");
                config = Self::read_file(&path)?;
            } else {
                debug!(?path, "Desk config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ApiError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ApiError::config(format!("Cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&contents)
            .map_err(|e| ApiError::config(format!("Invalid {}: {}", path.display(), e)))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("FIRESIDE_STORE_NAME") {
            self.store_name = name;
        }

        // Percent, e.g. "8.5"
        if let Ok(raw) = std::env::var("FIRESIDE_TAX_RATE") {
            match raw.trim().parse::<f64>().map(|pct| TaxRate::from_fraction(pct / 100.0)) {
                Ok(Ok(rate)) => self.tax_rate_bps = rate.bps(),
                _ => warn!(value = %raw, "Ignoring invalid FIRESIDE_TAX_RATE"),
            }
        }

        // Dollars, e.g. "3.00"
        if let Ok(raw) = std::env::var("FIRESIDE_DELIVERY_FEE") {
            match raw.trim().parse::<f64>().ok().and_then(Money::from_decimal) {
                Some(fee) => self.delivery_fee_cents = fee.cents(),
                None => warn!(value = %raw, "Ignoring invalid FIRESIDE_DELIVERY_FEE"),
            }
        }

        if let Ok(path) = std::env::var("FIRESIDE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("FIRESIDE_CATALOG_PATH") {
            self.catalog_path = Some(PathBuf::from(path));
        }

        self.payments.apply_env_overrides();
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.store_name.trim().is_empty() {
            return Err(ApiError::config("store_name must not be empty"));
        }
        validate_tax_rate_bps(self.tax_rate_bps)?;
        validate_adjustment("delivery_fee", self.delivery_fee())?;
        Ok(())
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("desk.toml"))
    }

    /// Configured database file, or `fireside.db` in the platform data folder.
    pub fn database_path(&self) -> Result<PathBuf, ApiError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }
        Ok(data_dir()?.join("fireside.db"))
    }

    /// Configured catalog file, or `menu.json` beside the database.
    pub fn catalog_path(&self) -> Result<PathBuf, ApiError> {
        if let Some(path) = &self.catalog_path {
            return Ok(path.clone());
        }
        let db_path = self.database_path()?;
        Ok(db_path
            .parent()
            .map(|dir| dir.join("menu.json"))
            .unwrap_or_else(|| PathBuf::from("menu.json")))
    }

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    pub fn delivery_fee(&self) -> Money {
        Money::from_cents(self.delivery_fee_cents)
    }

    /// Formats an amount with the configured symbol.
    ///
    /// ```rust
    /// use fireside_core::Money;
    /// use fireside_desk::state::DeskConfig;
    ///
    /// let config = DeskConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.currency_symbol,
            amount.dollars().abs(),
            amount.cents_part()
        )
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "fireside", "pos")
}

fn data_dir() -> Result<PathBuf, ApiError> {
    let dirs = project_dirs().ok_or_else(|| ApiError::config("Could not determine app data directory"))?;
    let dir = dirs.data_dir();
    std::fs::create_dir_all(dir)
        .map_err(|e| ApiError::config(format!("Cannot create {}: {}", dir.display(), e)))?;
    Ok(dir.to_path_buf())
}

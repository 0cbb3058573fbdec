//! # Session Context
//!
//! Everything one desk session mutates between commands. The caller owns it
//! and passes it into each command explicitly; nothing here is global.

use serde::{Deserialize, Serialize};

use super::{Cart, DeskConfig};
use fireside_core::{Money, TaxRate};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionContext {
    pub cart: Cart,

    /// Tax rate applied to orders placed in this session.
    pub tax_rate: TaxRate,

    /// Fee charged on delivery orders placed in this session.
    pub delivery_fee: Money,
}

impl SessionContext {
    /// Fresh session with the configured defaults.
    pub fn new(config: &DeskConfig) -> Self {
        SessionContext {
            cart: Cart::new(),
            tax_rate: config.tax_rate(),
            delivery_fee: config.delivery_fee(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_takes_config_defaults() {
        let config = DeskConfig {
            tax_rate_bps: 600,
            delivery_fee_cents: 450,
            ..DeskConfig::default()
        };
        let session = SessionContext::new(&config);
        assert_eq!(session.tax_rate.bps(), 600);
        assert_eq!(session.delivery_fee, Money::from_cents(450));
        assert!(session.cart.is_empty());
    }
}

//! # Menu Catalog
//!
//! The nested menu model: categories → items → sizes / toppings.
//!
//! ## Catalog Shape
//! ```text
//! {
//!   "categories": [
//!     { "name": "Pizzas",
//!       "items": [
//!         { "id": "pz_margherita", "name": "Margherita", "base_price": 12.0,
//!           "sizes":              [ {"name": "Medium 12\"", "price_delta": 3} ],
//!           "available_toppings": [ {"name": "Pepperoni",   "price_delta": 1.5} ],
//!           "included_toppings":  [ "Mozzarella", ... ]        ◄── kept as-is
//!         } ] } ] }
//! ```
//!
//! Prices are decimals in the text and [`Money`] in memory. Fields this
//! crate does not know about are kept in `extra` maps so an edit made in the
//! raw JSON editor survives a parse/serialize cycle.
//!
//! Reading and writing the file is fireside-db's job; this module only turns
//! text into a validated [`Catalog`] and back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{self, Money};
use crate::validation::{validate_ceiling, ValidationResult};

/// JSON for the menu seeded on first run.
pub const DEFAULT_CATALOG_JSON: &str = include_str!("../assets/default_menu.json");

// =============================================================================
// Catalog Types
// =============================================================================

/// A size option with its surcharge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub name: String,
    #[serde(with = "money::decimal", default)]
    pub price_delta: Money,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Size {
    pub fn new(name: impl Into<String>, price_delta: Money) -> Self {
        Size {
            name: name.into(),
            price_delta,
            extra: Map::new(),
        }
    }
}

/// A topping the customer may add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topping {
    pub name: String,
    #[serde(with = "money::decimal", default)]
    pub price_delta: Money,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Topping {
    pub fn new(name: impl Into<String>, price_delta: Money) -> Self {
        Topping {
            name: name.into(),
            price_delta,
            extra: Map::new(),
        }
    }
}

/// One orderable menu entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique across the whole catalog.
    pub id: String,
    pub name: String,
    #[serde(with = "money::decimal")]
    pub base_price: Money,
    #[serde(default)]
    pub sizes: Vec<Size>,
    #[serde(default)]
    pub available_toppings: Vec<Topping>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MenuItem {
    /// Surcharge for the named size, zero when the item has no such size.
    pub fn size_delta(&self, size: &str) -> Money {
        self.sizes
            .iter()
            .find(|s| s.name == size)
            .map(|s| s.price_delta)
            .unwrap_or_default()
    }

    /// Surcharge for the named topping, zero when the item does not offer it.
    pub fn topping_delta(&self, topping: &str) -> Money {
        self.available_toppings
            .iter()
            .find(|t| t.name == topping)
            .map(|t| t.price_delta)
            .unwrap_or_default()
    }

    /// First listed size, the one a new cart line starts with.
    pub fn default_size(&self) -> Option<&str> {
        self.sizes.first().map(|s| s.name.as_str())
    }
}

/// A named group of items ("Pizzas", "Drinks").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The whole menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Parsing and Serialization
// =============================================================================

impl Catalog {
    /// Parses and validates catalog text.
    ///
    /// A leading UTF-8 byte order mark is ignored (editors on Windows add one).
    ///
    /// ## Errors
    /// - [`ValidationError::Malformed`] when the text is not a catalog
    /// - [`ValidationError::InvalidFormat`] naming the item, size or topping
    ///   whose price has digits below the cent
    /// - any error from [`Catalog::validate`]
    pub fn parse(text: &str) -> ValidationResult<Catalog> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let value: Value = serde_json::from_str(text).map_err(malformed)?;
        check_price_precision(&value)?;
        let catalog: Catalog = serde_json::from_value(value).map_err(malformed)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The menu shipped with the application.
    pub fn default_menu() -> ValidationResult<Catalog> {
        Catalog::parse(DEFAULT_CATALOG_JSON)
    }

    /// Serializes as 2-space indented JSON, the on-disk format.
    pub fn to_pretty_json(&self) -> ValidationResult<String> {
        serde_json::to_string_pretty(self).map_err(malformed)
    }

    /// Checks the rules the JSON shape cannot express.
    ///
    /// ## Rules
    /// - every item has a non-empty id and name
    /// - item ids are unique across categories
    /// - base prices are not negative (deltas may be)
    /// - no price or delta is beyond [`MAX_AMOUNT`](crate::validation::MAX_AMOUNT) either way
    pub fn validate(&self) -> ValidationResult<()> {
        let mut seen = HashSet::new();
        for item in self.items() {
            if item.id.trim().is_empty() {
                return Err(ValidationError::required("item id"));
            }
            if item.name.trim().is_empty() {
                return Err(ValidationError::required(format!("name of item '{}'", item.id)));
            }
            if item.base_price.is_negative() {
                return Err(ValidationError::negative(format!(
                    "base_price of item '{}'",
                    item.id
                )));
            }
            validate_ceiling(&format!("base_price of item '{}'", item.id), item.base_price)?;
            for size in &item.sizes {
                validate_ceiling(
                    &format!("price_delta of size '{}' on item '{}'", size.name, item.id),
                    size.price_delta,
                )?;
            }
            for topping in &item.available_toppings {
                validate_ceiling(
                    &format!("price_delta of topping '{}' on item '{}'", topping.name, item.id),
                    topping.price_delta,
                )?;
            }
            if !seen.insert(item.id.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "item id".to_string(),
                    value: item.id.clone(),
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// All items in menu order.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    /// Finds an item by id with a linear scan.
    pub fn find_item(&self, item_id: &str) -> CoreResult<&MenuItem> {
        self.items()
            .find(|item| item.id == item_id)
            .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))
    }

    /// Number of items across all categories.
    pub fn item_count(&self) -> usize {
        self.items().count()
    }
}

fn malformed(err: serde_json::Error) -> ValidationError {
    ValidationError::Malformed {
        what: "catalog".to_string(),
        reason: err.to_string(),
    }
}

/// Rejects prices that would not survive being stored as whole cents.
///
/// Runs on the untyped JSON so the error can name the entry. Values of the
/// wrong type are left for the typed parse to report.
fn check_price_precision(root: &Value) -> ValidationResult<()> {
    let items = root
        .get("categories")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|category| category.get("items").and_then(Value::as_array))
        .flatten();

    for item in items {
        let id = item.get("id").and_then(Value::as_str).unwrap_or_default();
        check_price(item.get("base_price"), || format!("base_price of item '{}'", id))?;

        for (list, kind) in [("sizes", "size"), ("available_toppings", "topping")] {
            let options = item.get(list).and_then(Value::as_array).into_iter().flatten();
            for option in options {
                let name = option.get("name").and_then(Value::as_str).unwrap_or_default();
                check_price(option.get("price_delta"), || {
                    format!("price_delta of {} '{}' on item '{}'", kind, name, id)
                })?;
            }
        }
    }
    Ok(())
}

fn check_price(value: Option<&Value>, field: impl FnOnce() -> String) -> ValidationResult<()> {
    let Some(amount) = value.and_then(Value::as_f64) else {
        return Ok(());
    };
    if Money::from_decimal(amount).is_none() {
        return Err(ValidationError::InvalidFormat {
            field: field(),
            reason: format!("{} is not a whole number of cents", amount),
        });
    }
    Ok(())
}

/// Free-function form of [`Catalog::find_item`].
pub fn find_item<'a>(catalog: &'a Catalog, item_id: &str) -> CoreResult<&'a MenuItem> {
    catalog.find_item(item_id)
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Cart
//!
//! The lines being assembled for the next order.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Desk Action              Command              Cart Change              │
//! │  ───────────              ───────              ───────────              │
//! │                                                                         │
//! │  Add item ───────────────► add_to_cart() ────► lines.push(line)        │
//! │  + / − buttons ──────────► increment_line() ─► lines[i].qty ± 1        │
//! │                            decrement_line()    (floor 1)                │
//! │  Remove ─────────────────► remove_line() ────► lines.remove(i)         │
//! │  Order placed / Clear ───► clear_cart() ─────► lines.clear()           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each line is a price snapshot taken from the catalog when it was added.
//! The same item added twice with different toppings is two lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fireside_core::error::CoreResult;
use fireside_core::validation::validate_ceiling;
use fireside_core::{CartLine, CoreError, Money, MAX_CART_LINES, MAX_LINE_QUANTITY};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,

    /// When the cart was created or last cleared
    pub started_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Appends a line and returns its index.
    ///
    /// ## Limits
    /// - at most [`MAX_CART_LINES`] lines
    /// - quantity at most [`MAX_LINE_QUANTITY`]
    /// - line total within [`MAX_AMOUNT`](fireside_core::validation::MAX_AMOUNT), so the subtotal stays in range
    pub fn add_line(&mut self, line: CartLine) -> CoreResult<usize> {
        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge { max: MAX_CART_LINES });
        }
        if line.qty > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: line.qty,
                max: MAX_LINE_QUANTITY,
            });
        }
        validate_ceiling("line total", line.line_total)?;
        self.lines.push(line);
        Ok(self.lines.len() - 1)
    }

    pub fn increment(&mut self, index: usize) -> CoreResult<&CartLine> {
        let line = self.line_mut(index)?;
        line.set_qty(line.qty + 1)?;
        Ok(line)
    }

    /// Decreases the quantity, never below 1.
    pub fn decrement(&mut self, index: usize) -> CoreResult<&CartLine> {
        let line = self.line_mut(index)?;
        line.set_qty(line.qty - 1)?;
        Ok(line)
    }

    pub fn remove(&mut self, index: usize) -> CoreResult<CartLine> {
        if index >= self.lines.len() {
            return Err(CoreError::LineNotFound(index));
        }
        Ok(self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.started_at = Utc::now();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.qty).sum()
    }

    /// Sum of line totals, before discount and tax.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(|l| l.line_total).sum()
    }

    fn line_mut(&mut self, index: usize) -> CoreResult<&mut CartLine> {
        self.lines.get_mut(index).ok_or(CoreError::LineNotFound(index))
    }
}

/// Cart contents and running totals for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        CartSummary {
            lines: cart.lines.clone(),
            line_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
        }
    }
}

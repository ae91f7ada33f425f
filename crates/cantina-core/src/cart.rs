//! # Cart Module
//!
//! The session-scoped cart that feeds checkout.
//!
//! ## Ownership
//! The cart is an explicit value: the caller's session owns it, passes it
//! into cart operations, and hands it to `Checkout::finalize` in
//! cantina-db. It is never persisted; abandoning the session discards it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Pick product ───► add_item()    ───► accumulate or push line   │
//! │  Remove line  ───► remove_item() ───► false when absent (warn)  │
//! │  Finish sale  ───► Checkout::finalize(&mut cart) in cantina-db  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Checking
//! `add_item` checks the requested quantity against the stock level the
//! caller read when offering the product. That read can be stale by the
//! time checkout runs; checkout does NOT re-check. This is acceptable for
//! a single-operator store and is the documented staleness window of this
//! system.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::Product;
use crate::validation::validate_quantity;

/// One pending line in the cart.
///
/// `unit_price_cents` and `name` are snapshotted from the catalog at the
/// moment of first insertion; later catalog edits do not affect them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
}

impl CartLine {
    /// Line subtotal (unit price × quantity).
    #[inline]
    pub fn subtotal_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

/// Transient collection of pending line items, unique by product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a product to the cart or accumulates quantity if already
    /// present.
    ///
    /// `in_stock` is the stock level the caller read when the product was
    /// offered. The accumulated cart quantity for the product may not
    /// exceed it.
    ///
    /// The unit price is captured once, at first insertion. Adding the
    /// same product again keeps the original snapshot even if the catalog
    /// price changed in between.
    pub fn add_item(&mut self, product: &Product, in_stock: i64, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let requested = line.quantity + quantity;
            if requested > in_stock {
                return Err(CoreError::InsufficientStock {
                    name: product.name.clone(),
                    available: in_stock,
                    requested,
                });
            }
            line.quantity = requested;
            return Ok(());
        }

        if quantity > in_stock {
            return Err(CoreError::InsufficientStock {
                name: product.name.clone(),
                available: in_stock,
                requested: quantity,
            });
        }

        self.lines.push(CartLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price_cents: product.sale_price_cents,
            quantity,
        });
        Ok(())
    }

    /// Removes a product's line from the cart.
    ///
    /// Returns `false` when the product was not in the cart; callers
    /// report that as a warning, not an error.
    pub fn remove_item(&mut self, product_id: i64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    /// The pending lines, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct products in the cart.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total unit count across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Cart total: Σ(unit price × quantity).
    pub fn total_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.subtotal_cents()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Discards all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

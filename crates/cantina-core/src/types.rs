//! # Domain Types
//!
//! Core domain entities used throughout Cantina.
//!
//! ## Entity Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Domain Entities                          │
//! │                                                                 │
//! │   ┌──────────┐ 1:1 ┌───────────┐                                │
//! │   │ Product  │◄────│ Inventory │  created and destroyed         │
//! │   └────┬─────┘     └───────────┘  together with the product     │
//! │        │ 1:N                                                    │
//! │        ▼                                                        │
//! │   ┌──────────────┐ N:1 ┌──────┐                                 │
//! │   │ SaleLineItem │────►│ Sale │  immutable once committed       │
//! │   └──────────────┘     └──────┘                                 │
//! │                                                                 │
//! │   ┌─────────┐                                                   │
//! │   │ Expense │  independent, no relationships                    │
//! │   └─────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All ids are surrogate integers assigned by the database. All prices are
//! integer cents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Surrogate id assigned by the database.
    pub id: i64,

    /// Display name shown at the counter.
    pub name: String,

    /// Optional free-text description.
    pub description: Option<String>,

    /// What the store pays per unit, in cents.
    pub purchase_price_cents: i64,

    /// What the store charges per unit, in cents.
    pub sale_price_cents: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as Money.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }

    /// Returns the purchase price as Money.
    #[inline]
    pub fn purchase_price(&self) -> Money {
        Money::from_cents(self.purchase_price_cents)
    }

    /// Per-unit margin at current catalog prices. May be negative; no
    /// invariant ties sale price to purchase price.
    #[inline]
    pub fn margin(&self) -> Money {
        self.sale_price() - self.purchase_price()
    }
}

/// Input for creating a product together with its inventory row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub purchase_price_cents: i64,
    pub sale_price_cents: i64,
    /// Starting stock for the paired inventory row.
    pub initial_quantity: i64,
}

/// Mutable product fields for an update.
///
/// Presence of the id is the only thing the store checks; field validation
/// is the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductChanges {
    pub name: String,
    pub description: Option<String>,
    pub purchase_price_cents: i64,
    pub sale_price_cents: i64,
}

// =============================================================================
// Inventory
// =============================================================================

/// Stock record for a product. Exactly one per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Inventory {
    pub id: i64,

    /// The product this row tracks (1:1).
    pub product_id: i64,

    /// Units on hand. Not floored at zero: a stale cart can drive it
    /// negative, which reads as a backorder.
    pub quantity: i64,

    pub last_updated: DateTime<Utc>,
}

/// A product joined with its current stock level, for listing screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductWithStock {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub purchase_price_cents: i64,
    pub sale_price_cents: i64,
    pub created_at: DateTime<Utc>,
    /// 0 when the inventory row is missing.
    pub quantity: i64,
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale. Append-only: sales are historical fact, no update or
/// delete operation exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub sold_at: DateTime<Utc>,
    /// Always equals the sum of this sale's line subtotals.
    pub total_cents: i64,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// One product-quantity-price entry within a sale.
///
/// `unit_price_cents` is a snapshot of the catalog sale price at the moment
/// the product entered the cart, so historical totals stay correct when
/// catalog prices later change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLineItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl SaleLineItem {
    /// Line subtotal (unit price × quantity).
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Expense
// =============================================================================

/// A recorded expense. Independent of inventory; feeds the cash-flow
/// report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub amount_cents: i64,
    pub incurred_at: DateTime<Utc>,
}

impl Expense {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(purchase: i64, sale: i64) -> Product {
        Product {
            id: 1,
            name: "Agua 600ml".to_string(),
            description: None,
            purchase_price_cents: purchase,
            sale_price_cents: sale,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_product_margin() {
        assert_eq!(product(200, 500).margin().cents(), 300);
        // Negative margin is allowed.
        assert_eq!(product(500, 200).margin().cents(), -300);
    }

    #[test]
    fn test_line_item_subtotal() {
        let line = SaleLineItem {
            id: 1,
            sale_id: 1,
            product_id: 1,
            quantity: 3,
            unit_price_cents: 500,
        };
        assert_eq!(line.subtotal().cents(), 1500);
    }
}

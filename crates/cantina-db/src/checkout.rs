//! # Checkout
//!
//! Turns a cart into a committed sale.
//!
//! ## Transaction Shape
//! ```text
//! BEGIN
//!   INSERT sale header            ← id from last_insert_rowid()
//!   for each cart line:
//!     INSERT sale_line_item       ← snapshot unit price from the cart
//!     UPDATE inventory -quantity  ← 0 rows touched ⇒ abort
//! COMMIT
//! ```
//! Any failure before COMMIT rolls the whole sale back; the ledger never
//! holds a header without its lines or a decrement without its line.
//! The cart is cleared only after the commit succeeds, so a failed
//! checkout leaves it intact for retry.

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::DbError;
use cantina_core::{Cart, Sale};

/// Errors from finalizing a sale.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines; there is nothing to sell.
    #[error("cannot finalize an empty cart")]
    EmptyCart,

    /// A cart line references a product whose inventory row is gone
    /// while the product itself still exists — a data-integrity gap,
    /// since the two are created and destroyed together. The whole sale
    /// was rolled back. (A fully deleted product fails earlier, as a
    /// foreign key violation on the line-item insert.)
    #[error("no inventory row for product {product_id}; sale rolled back")]
    InventoryMissing { product_id: i64 },

    /// Underlying storage failure; the whole sale was rolled back.
    #[error(transparent)]
    Storage(#[from] DbError),
}

/// Executes the atomic sale transaction.
#[derive(Debug, Clone)]
pub struct Checkout {
    pool: SqlitePool,
}

impl Checkout {
    /// Creates a new Checkout against a pool.
    pub fn new(pool: SqlitePool) -> Self {
        Checkout { pool }
    }

    /// Finalizes the cart as one sale: writes the header, one line item
    /// per cart line at the carted unit price, and decrements inventory,
    /// all in a single transaction.
    ///
    /// On success the cart is cleared and the persisted [`Sale`] is
    /// returned. On any error the database is unchanged and the cart is
    /// left as it was.
    ///
    /// Stock may go negative here: the cart checked availability when
    /// lines were added, and a concurrent sale slipping in between is an
    /// accepted backorder rather than a reason to abort.
    pub async fn finalize(&self, cart: &mut Cart) -> Result<Sale, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let sold_at = Utc::now();
        let total_cents = cart.total_cents();

        debug!(
            lines = cart.line_count(),
            total_cents, "finalizing sale"
        );

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let result = sqlx::query("INSERT INTO sales (sold_at, total_cents) VALUES (?1, ?2)")
            .bind(sold_at)
            .bind(total_cents)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;
        let sale_id = result.last_insert_rowid();

        for line in cart.lines() {
            sqlx::query(
                r#"
                INSERT INTO sale_line_items (sale_id, product_id, quantity, unit_price_cents)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(sale_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

            let updated = sqlx::query(
                r#"
                UPDATE inventory
                SET quantity = quantity - ?2, last_updated = ?3
                WHERE product_id = ?1
                "#,
            )
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(sold_at)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

            if updated.rows_affected() == 0 {
                // Dropping tx rolls back the header and earlier lines.
                return Err(CheckoutError::InventoryMissing {
                    product_id: line.product_id,
                });
            }
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(sale_id, total_cents, "sale committed");

        cart.clear();

        Ok(Sale {
            id: sale_id,
            sold_at,
            total_cents,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Sale Repository
//!
//! Read access to the sale ledger.
//!
//! The ledger is append-only: the only writer is the checkout transaction
//! in [`crate::checkout`]. Sales are historical fact; no update or delete
//! operation exists.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::DbResult;
use cantina_core::{Sale, SaleLineItem};

/// Repository for sale reads.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, sold_at, total_cents
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets all line items for a sale, in insertion order (display order;
    /// correctness doesn't depend on it).
    pub async fn line_items(&self, sale_id: i64) -> DbResult<Vec<SaleLineItem>> {
        let items = sqlx::query_as::<_, SaleLineItem>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price_cents
            FROM sale_line_items
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists sales in `[start, end)`, oldest first.
    pub async fn list_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, sold_at, total_cents
            FROM sales
            WHERE sold_at >= ?1 AND sold_at < ?2
            ORDER BY sold_at, id
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Counts sales in `[start, end)`.
    pub async fn count_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sales WHERE sold_at >= ?1 AND sold_at < ?2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

//! # Report Repository
//!
//! Read-side aggregations over sales, line items, products, and expenses.
//!
//! Every query is parametrized by a half-open range `[start, end)` and
//! never fails on "no rows": empty ranges yield zeros and empty vectors.
//! Nothing in this module writes.
//!
//! ## Profit Basis
//! Profit per product uses the CURRENT catalog prices, not the line
//! items' historical snapshot prices. That matches the behavior of the
//! original reporting screen; a restated price changes reported profit
//! for past periods. The stored line-item snapshot keeps sale totals
//! themselves stable either way.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::DbResult;

/// Start/end instants of a calendar day, for day-scoped reports.
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    let end = match day.succ_opt() {
        Some(next) => next.and_time(NaiveTime::MIN).and_utc(),
        None => DateTime::<Utc>::MAX_UTC,
    };
    (start, end)
}

// =============================================================================
// Read Models
// =============================================================================

/// Headline figures for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub revenue_cents: i64,
    pub transaction_count: i64,
    /// revenue / transactions, 0 when there were no transactions.
    pub average_ticket_cents: i64,
}

/// Revenue for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyRevenue {
    pub day: NaiveDate,
    pub revenue_cents: i64,
}

/// Units sold of one product over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductSales {
    pub product_id: i64,
    pub name: String,
    pub quantity_sold: i64,
}

/// Profit attribution for one product over a period, at current catalog
/// prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductProfit {
    pub product_id: i64,
    pub name: String,
    pub quantity_sold: i64,
    pub profit_cents: i64,
}

/// Current stock next to period sales, for spotting fast movers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StockMovement {
    pub product_id: i64,
    pub name: String,
    pub in_stock: i64,
    pub quantity_sold: i64,
}

/// Revenue vs expenses for a period. Net is derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlow {
    pub revenue_cents: i64,
    pub expense_cents: i64,
    pub net_cents: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for read-only reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Total revenue, transaction count, and average ticket for
    /// `[start, end)`.
    pub async fn summary(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<SalesSummary> {
        let row: (Option<i64>, i64) = sqlx::query_as(
            r#"
            SELECT SUM(total_cents), COUNT(*)
            FROM sales
            WHERE sold_at >= ?1 AND sold_at < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        let revenue_cents = row.0.unwrap_or(0);
        let transaction_count = row.1;
        let average_ticket_cents = if transaction_count > 0 {
            revenue_cents / transaction_count
        } else {
            0
        };

        Ok(SalesSummary {
            revenue_cents,
            transaction_count,
            average_ticket_cents,
        })
    }

    /// Per-day revenue over `[start, end)`, ascending by day.
    pub async fn daily_revenue(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<DailyRevenue>> {
        let rows = sqlx::query_as::<_, DailyRevenue>(
            r#"
            SELECT date(sold_at) AS day, SUM(total_cents) AS revenue_cents
            FROM sales
            WHERE sold_at >= ?1 AND sold_at < ?2
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Top `limit` products by units sold in `[start, end)`.
    ///
    /// Ties break by product id ascending so the ordering is
    /// deterministic.
    pub async fn top_products(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: i64,
    ) -> DbResult<Vec<ProductSales>> {
        let rows = sqlx::query_as::<_, ProductSales>(
            r#"
            SELECT
                p.id AS product_id,
                p.name AS name,
                SUM(li.quantity) AS quantity_sold
            FROM sale_line_items li
            INNER JOIN sales s ON s.id = li.sale_id
            INNER JOIN products p ON p.id = li.product_id
            WHERE s.sold_at >= ?1 AND s.sold_at < ?2
            GROUP BY p.id, p.name
            ORDER BY quantity_sold DESC, p.id ASC
            LIMIT ?3
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Profit per product over `[start, end)`:
    /// Σ quantity × (current sale price − current purchase price).
    pub async fn profit_by_product(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<ProductProfit>> {
        let rows = sqlx::query_as::<_, ProductProfit>(
            r#"
            SELECT
                p.id AS product_id,
                p.name AS name,
                SUM(li.quantity) AS quantity_sold,
                SUM(li.quantity * (p.sale_price_cents - p.purchase_price_cents)) AS profit_cents
            FROM sale_line_items li
            INNER JOIN sales s ON s.id = li.sale_id
            INNER JOIN products p ON p.id = li.product_id
            WHERE s.sold_at >= ?1 AND s.sold_at < ?2
            GROUP BY p.id, p.name
            ORDER BY profit_cents DESC, p.id ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Current stock level next to units sold in `[start, end)` for every
    /// product. Products with no sales in the period report 0 sold.
    pub async fn stock_vs_sales(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<StockMovement>> {
        let rows = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT
                p.id AS product_id,
                p.name AS name,
                COALESCE(i.quantity, 0) AS in_stock,
                COALESCE(sold.units, 0) AS quantity_sold
            FROM products p
            LEFT JOIN inventory i ON i.product_id = p.id
            LEFT JOIN (
                SELECT li.product_id AS product_id, SUM(li.quantity) AS units
                FROM sale_line_items li
                INNER JOIN sales s ON s.id = li.sale_id
                WHERE s.sold_at >= ?1 AND s.sold_at < ?2
                GROUP BY li.product_id
            ) sold ON sold.product_id = p.id
            ORDER BY quantity_sold DESC, p.id ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Revenue minus expenses for `[start, end)`.
    pub async fn cash_flow(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> DbResult<CashFlow> {
        let revenue: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(total_cents) FROM sales WHERE sold_at >= ?1 AND sold_at < ?2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        let expenses: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(amount_cents) FROM expenses WHERE incurred_at >= ?1 AND incurred_at < ?2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        let revenue_cents = revenue.unwrap_or(0);
        let expense_cents = expenses.unwrap_or(0);

        Ok(CashFlow {
            revenue_cents,
            expense_cents,
            net_cents: revenue_cents - expense_cents,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use cantina_core::{Cart, NewProduct};
    use chrono::Duration;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn product(name: &str, purchase: i64, sale: i64, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: None,
            purchase_price_cents: purchase,
            sale_price_cents: sale,
            initial_quantity: stock,
        }
    }

    fn range_around_now() -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now - Duration::hours(1), now + Duration::hours(1))
    }

    /// The worked example: product at 2.00/5.00 with stock 10, sell 3.
    /// Revenue 15.00, one transaction, top product with quantity 3,
    /// profit 3 × (5.00 − 2.00) = 9.00.
    #[tokio::test]
    async fn test_worked_example() {
        let db = test_db().await;
        let a = db
            .catalog()
            .create_product(&product("Producto A", 200, 500, 10))
            .await
            .unwrap();

        let mut cart = Cart::new();
        cart.add_item(&a, 10, 3).unwrap();
        let sale = db.checkout().finalize(&mut cart).await.unwrap();
        assert_eq!(sale.total_cents, 1500);

        let (start, end) = range_around_now();
        let reports = db.reports();

        let summary = reports.summary(start, end).await.unwrap();
        assert_eq!(summary.revenue_cents, 1500);
        assert_eq!(summary.transaction_count, 1);
        assert_eq!(summary.average_ticket_cents, 1500);

        let top = reports.top_products(start, end, 5).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].product_id, a.id);
        assert_eq!(top[0].quantity_sold, 3);

        let profit = reports.profit_by_product(start, end).await.unwrap();
        assert_eq!(profit.len(), 1);
        assert_eq!(profit[0].profit_cents, 900);

        let stock = reports.stock_vs_sales(start, end).await.unwrap();
        assert_eq!(stock[0].in_stock, 7);
        assert_eq!(stock[0].quantity_sold, 3);
    }

    #[tokio::test]
    async fn test_empty_range_yields_zeros() {
        let db = test_db().await;
        let (start, end) = range_around_now();
        let reports = db.reports();

        let summary = reports.summary(start, end).await.unwrap();
        assert_eq!(summary.revenue_cents, 0);
        assert_eq!(summary.transaction_count, 0);
        assert_eq!(summary.average_ticket_cents, 0);

        assert!(reports.daily_revenue(start, end).await.unwrap().is_empty());
        assert!(reports.top_products(start, end, 10).await.unwrap().is_empty());

        let flow = reports.cash_flow(start, end).await.unwrap();
        assert_eq!(flow.net_cents, 0);
    }

    #[tokio::test]
    async fn test_top_products_tie_breaks_by_id() {
        let db = test_db().await;
        let catalog = db.catalog();
        let a = catalog
            .create_product(&product("A", 100, 200, 10))
            .await
            .unwrap();
        let b = catalog
            .create_product(&product("B", 100, 200, 10))
            .await
            .unwrap();

        // Same quantity for both, in one sale each.
        for p in [&b, &a] {
            let mut cart = Cart::new();
            cart.add_item(p, 10, 2).unwrap();
            db.checkout().finalize(&mut cart).await.unwrap();
        }

        let (start, end) = range_around_now();
        let top = db.reports().top_products(start, end, 10).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].product_id, a.id.min(b.id));
        assert_eq!(top[1].product_id, a.id.max(b.id));
    }

    #[tokio::test]
    async fn test_profit_uses_current_catalog_prices() {
        let db = test_db().await;
        let a = db
            .catalog()
            .create_product(&product("A", 200, 500, 10))
            .await
            .unwrap();

        let mut cart = Cart::new();
        cart.add_item(&a, 10, 2).unwrap();
        db.checkout().finalize(&mut cart).await.unwrap();

        // Raise the catalog price after the sale: profit follows the new
        // prices, while the stored sale total does not move.
        db.catalog()
            .update_product(
                a.id,
                &cantina_core::ProductChanges {
                    name: a.name.clone(),
                    description: None,
                    purchase_price_cents: 200,
                    sale_price_cents: 700,
                },
            )
            .await
            .unwrap();

        let (start, end) = range_around_now();
        let profit = db.reports().profit_by_product(start, end).await.unwrap();
        assert_eq!(profit[0].profit_cents, 2 * (700 - 200));

        let summary = db.reports().summary(start, end).await.unwrap();
        assert_eq!(summary.revenue_cents, 1000);
    }

    #[tokio::test]
    async fn test_cash_flow() {
        let db = test_db().await;
        let a = db
            .catalog()
            .create_product(&product("A", 200, 500, 10))
            .await
            .unwrap();

        let mut cart = Cart::new();
        cart.add_item(&a, 10, 4).unwrap();
        db.checkout().finalize(&mut cart).await.unwrap();
        db.expenses().record("Bolsas", 300).await.unwrap();

        let (start, end) = range_around_now();
        let flow = db.reports().cash_flow(start, end).await.unwrap();
        assert_eq!(flow.revenue_cents, 2000);
        assert_eq!(flow.expense_cents, 300);
        assert_eq!(flow.net_cents, 1700);
    }

    #[tokio::test]
    async fn test_daily_revenue_groups_by_day() {
        let db = test_db().await;
        let a = db
            .catalog()
            .create_product(&product("A", 200, 500, 10))
            .await
            .unwrap();

        let mut cart = Cart::new();
        cart.add_item(&a, 10, 1).unwrap();
        db.checkout().finalize(&mut cart).await.unwrap();

        let mut cart = Cart::new();
        cart.add_item(&a, 9, 2).unwrap();
        db.checkout().finalize(&mut cart).await.unwrap();

        let (start, end) = range_around_now();
        let days = db.reports().daily_revenue(start, end).await.unwrap();
        // Both sales landed just now; in the worst case the hour window
        // straddles midnight and they split across two days.
        let total: i64 = days.iter().map(|d| d.revenue_cents).sum();
        assert_eq!(total, 1500);
    }

    #[test]
    fn test_day_bounds() {
        let day = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let (start, end) = day_bounds(day);
        assert_eq!(start.date_naive(), day);
        assert_eq!(end - start, Duration::days(1));
    }
}

//! # Expense Repository
//!
//! The expense ledger: independent of inventory, feeds the cash-flow
//! report.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use cantina_core::{validation, Expense};

/// Repository for expense entries.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Records an expense. Description must be non-empty and the amount
    /// strictly positive; a validation failure writes nothing.
    pub async fn record(&self, description: &str, amount_cents: i64) -> DbResult<Expense> {
        validation::validate_expense(description, amount_cents)?;

        let now = Utc::now();

        debug!(description, amount_cents, "recording expense");

        let result = sqlx::query(
            r#"
            INSERT INTO expenses (description, amount_cents, incurred_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(description)
        .bind(amount_cents)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(Expense {
            id: result.last_insert_rowid(),
            description: description.to_string(),
            amount_cents,
            incurred_at: now,
        })
    }

    /// Lists expenses in `[start, end)`, oldest first.
    pub async fn list_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, description, amount_cents, incurred_at
            FROM expenses
            WHERE incurred_at >= ?1 AND incurred_at < ?2
            ORDER BY incurred_at, id
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// Sums expenses in `[start, end)`. Empty ranges sum to 0.
    pub async fn sum_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(amount_cents) FROM expenses WHERE incurred_at >= ?1 AND incurred_at < ?2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_record_and_sum() {
        let db = test_db().await;
        let expenses = db.expenses();

        expenses.record("Bolsas", 1500).await.unwrap();
        expenses.record("Servilletas", 800).await.unwrap();

        let now = Utc::now();
        let total = expenses
            .sum_in_range(now - Duration::hours(1), now + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(total, 2300);

        let listed = expenses
            .list_in_range(now - Duration::hours(1), now + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].description, "Bolsas");
    }

    #[tokio::test]
    async fn test_record_rejects_invalid() {
        let db = test_db().await;
        let expenses = db.expenses();

        assert!(expenses.record("", 100).await.is_err());
        assert!(expenses.record("Bolsas", 0).await.is_err());
        assert!(expenses.record("Bolsas", -50).await.is_err());

        let now = Utc::now();
        let total = expenses
            .sum_in_range(now - Duration::hours(1), now + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_empty_range_sums_to_zero() {
        let db = test_db().await;
        let expenses = db.expenses();

        let far_past = Utc::now() - Duration::days(1000);
        let total = expenses
            .sum_in_range(far_past, far_past + Duration::days(1))
            .await
            .unwrap();
        assert_eq!(total, 0);
    }
}

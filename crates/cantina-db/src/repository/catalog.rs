//! # Catalog Repository
//!
//! Database operations for products and their inventory rows.
//!
//! ## Product ↔ Inventory Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  create_product()   INSERT product + INSERT inventory           │
//! │                     └── one transaction, both or neither        │
//! │                                                                 │
//! │  set_stock() / restock()   mutate the inventory row only        │
//! │                                                                 │
//! │  delete_product()   DELETE inventory, then DELETE product       │
//! │                     └── one transaction; fails with a foreign   │
//! │                         key violation if historical line items  │
//! │                         still reference the product             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use cantina_core::{
    validation, Inventory, NewProduct, Product, ProductChanges, ProductWithStock,
};

/// Repository for the catalog store.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Creates a product and its paired inventory row as one atomic unit.
    ///
    /// Validates up front (name non-empty, both prices > 0, initial stock
    /// ≥ 0); a validation failure writes nothing.
    pub async fn create_product(&self, input: &NewProduct) -> DbResult<Product> {
        validation::validate_new_product(input)?;

        let now = Utc::now();

        debug!(name = %input.name, "creating product");

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, description, purchase_price_cents, sale_price_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.purchase_price_cents)
        .bind(input.sale_price_cents)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        let product_id = result.last_insert_rowid();

        sqlx::query(
            r#"
            INSERT INTO inventory (product_id, quantity, last_updated)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(product_id)
        .bind(input.initial_quantity)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        Ok(Product {
            id: product_id,
            name: input.name.clone(),
            description: input.description.clone(),
            purchase_price_cents: input.purchase_price_cents,
            sale_price_cents: input.sale_price_cents,
            created_at: now,
        })
    }

    /// Gets a product by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, purchase_price_cents, sale_price_cents, created_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product's inventory row.
    pub async fn get_inventory(&self, product_id: i64) -> DbResult<Option<Inventory>> {
        let inventory = sqlx::query_as::<_, Inventory>(
            r#"
            SELECT id, product_id, quantity, last_updated
            FROM inventory
            WHERE product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inventory)
    }

    /// Lists all products, by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, purchase_price_cents, sale_price_cents, created_at
            FROM products
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists all products joined with their stock level in one query,
    /// instead of a per-row inventory lookup. A missing inventory row
    /// reads as quantity 0.
    pub async fn list_with_stock(&self) -> DbResult<Vec<ProductWithStock>> {
        let rows = sqlx::query_as::<_, ProductWithStock>(
            r#"
            SELECT
                p.id,
                p.name,
                p.description,
                p.purchase_price_cents,
                p.sale_price_cents,
                p.created_at,
                COALESCE(i.quantity, 0) AS quantity
            FROM products p
            LEFT JOIN inventory i ON i.product_id = p.id
            ORDER BY p.name, p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Products currently sellable (stock > 0), for the sales screen.
    pub async fn list_in_stock(&self) -> DbResult<Vec<ProductWithStock>> {
        let rows = sqlx::query_as::<_, ProductWithStock>(
            r#"
            SELECT
                p.id,
                p.name,
                p.description,
                p.purchase_price_cents,
                p.sale_price_cents,
                p.created_at,
                i.quantity AS quantity
            FROM products p
            INNER JOIN inventory i ON i.product_id = p.id
            WHERE i.quantity > 0
            ORDER BY p.name, p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Products at or below the given stock threshold, for the restock
    /// list.
    pub async fn list_low_stock(&self, threshold: i64) -> DbResult<Vec<ProductWithStock>> {
        let rows = sqlx::query_as::<_, ProductWithStock>(
            r#"
            SELECT
                p.id,
                p.name,
                p.description,
                p.purchase_price_cents,
                p.sale_price_cents,
                p.created_at,
                COALESCE(i.quantity, 0) AS quantity
            FROM products p
            LEFT JOIN inventory i ON i.product_id = p.id
            WHERE COALESCE(i.quantity, 0) <= ?1
            ORDER BY quantity, p.id
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Updates a product's mutable fields.
    ///
    /// Returns `false` when the id doesn't exist. No field validation at
    /// this layer; that's the caller's responsibility.
    pub async fn update_product(&self, id: i64, changes: &ProductChanges) -> DbResult<bool> {
        debug!(id, "updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                purchase_price_cents = ?4,
                sale_price_cents = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.purchase_price_cents)
        .bind(changes.sale_price_cents)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Sets a product's stock to an absolute quantity.
    ///
    /// Returns `false` when no inventory row exists for the product.
    pub async fn set_stock(&self, product_id: i64, quantity: i64) -> DbResult<bool> {
        debug!(product_id, quantity, "setting stock");

        let result = sqlx::query(
            r#"
            UPDATE inventory SET quantity = ?2, last_updated = ?3
            WHERE product_id = ?1
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Adjusts a product's stock by a delta (positive for restocking).
    ///
    /// Returns `false` when no inventory row exists for the product.
    pub async fn restock(&self, product_id: i64, delta: i64) -> DbResult<bool> {
        debug!(product_id, delta, "adjusting stock");

        let result = sqlx::query(
            r#"
            UPDATE inventory SET quantity = quantity + ?2, last_updated = ?3
            WHERE product_id = ?1
            "#,
        )
        .bind(product_id)
        .bind(delta)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a product and its inventory row as one atomic unit.
    ///
    /// Returns `false` when the product doesn't exist. When historical
    /// sale line items still reference the product, the delete fails with
    /// [`DbError::ForeignKeyViolation`] and nothing is removed.
    pub async fn delete_product(&self, id: i64) -> DbResult<bool> {
        debug!(id, "deleting product");

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        // Inventory first: it references the product.
        sqlx::query("DELETE FROM inventory WHERE product_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            // Nothing to delete; the open transaction is dropped and
            // rolled back, leaving any orphan-free state untouched.
            return Ok(false);
        }

        tx.commit().await.map_err(DbError::from)?;
        Ok(true)
    }

    /// Counts catalog entries.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Backup
//!
//! Full-store export and import as a ZIP of per-table CSVs.
//!
//! ## Archive Layout
//! ```text
//! backup.zip
//! ├── products.csv
//! ├── inventory.csv
//! ├── sales.csv
//! ├── sale_line_items.csv
//! └── expenses.csv
//! ```
//! Every CSV carries a header row, even for an empty table, so an export
//! of an empty store imports back cleanly.
//!
//! ## Import Contract
//! Import is restore, not merge: the archive is parsed and validated in
//! full BEFORE anything is touched, then the current contents of all five
//! tables are replaced in a single transaction, preserving the archive's
//! ids. A header with an unknown or missing column rejects the whole
//! archive up front; a storage failure mid-import rolls everything back.

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::DbError;
use cantina_core::{Expense, Inventory, Product, Sale, SaleLineItem};

// Column order matches the serde field order of the corresponding type.
const PRODUCT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "description",
    "purchase_price_cents",
    "sale_price_cents",
    "created_at",
];
const INVENTORY_COLUMNS: &[&str] = &["id", "product_id", "quantity", "last_updated"];
const SALE_COLUMNS: &[&str] = &["id", "sold_at", "total_cents"];
const LINE_ITEM_COLUMNS: &[&str] = &["id", "sale_id", "product_id", "quantity", "unit_price_cents"];
const EXPENSE_COLUMNS: &[&str] = &["id", "description", "amount_cents", "incurred_at"];

/// Errors from exporting or importing a backup archive.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The archive is missing one of the five table CSVs.
    #[error("backup archive is missing table file: {table}")]
    MissingTable { table: String },

    /// A CSV header names a column the table does not have.
    #[error("unknown column '{column}' in {table}")]
    UnknownColumn { table: String, column: String },

    /// A CSV header is missing a required column.
    #[error("missing column '{column}' in {table}")]
    MissingColumn { table: String, column: String },

    /// A row in a table CSV failed to parse.
    #[error("malformed row in {table}: {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    /// The ZIP container itself is unreadable or unwritable.
    #[error("archive error: {0}")]
    Zip(#[from] ZipError),

    /// Filesystem error reading or writing the archive.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Storage failure; an import in flight was rolled back.
    #[error(transparent)]
    Storage(#[from] DbError),
}

/// Exports and restores the whole store as a ZIP archive.
#[derive(Debug, Clone)]
pub struct Backup {
    pool: SqlitePool,
}

impl Backup {
    /// Creates a new Backup against a pool.
    pub fn new(pool: SqlitePool) -> Self {
        Backup { pool }
    }

    /// Exports all five tables into a ZIP archive written to `writer`.
    pub async fn export_to_writer<W: Write + Seek>(&self, writer: W) -> Result<(), BackupError> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, purchase_price_cents, sale_price_cents, created_at
            FROM products ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;
        write_table(&mut zip, options, "products.csv", PRODUCT_COLUMNS, &products)?;

        let inventory = sqlx::query_as::<_, Inventory>(
            "SELECT id, product_id, quantity, last_updated FROM inventory ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;
        write_table(
            &mut zip,
            options,
            "inventory.csv",
            INVENTORY_COLUMNS,
            &inventory,
        )?;

        let sales =
            sqlx::query_as::<_, Sale>("SELECT id, sold_at, total_cents FROM sales ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(DbError::from)?;
        write_table(&mut zip, options, "sales.csv", SALE_COLUMNS, &sales)?;

        let line_items = sqlx::query_as::<_, SaleLineItem>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price_cents
            FROM sale_line_items ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;
        write_table(
            &mut zip,
            options,
            "sale_line_items.csv",
            LINE_ITEM_COLUMNS,
            &line_items,
        )?;

        let expenses = sqlx::query_as::<_, Expense>(
            "SELECT id, description, amount_cents, incurred_at FROM expenses ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;
        write_table(&mut zip, options, "expenses.csv", EXPENSE_COLUMNS, &expenses)?;

        zip.finish()?;

        info!(
            products = products.len(),
            sales = sales.len(),
            expenses = expenses.len(),
            "backup exported"
        );

        Ok(())
    }

    /// Exports the store to a ZIP file at `path`.
    pub async fn export_to_file(&self, path: impl AsRef<Path>) -> Result<(), BackupError> {
        let file = File::create(path)?;
        self.export_to_writer(file).await
    }

    /// Restores the store from a ZIP archive read from `reader`,
    /// replacing all current data and preserving the archive's ids.
    pub async fn import_from_reader<R: Read + Seek>(&self, reader: R) -> Result<(), BackupError> {
        let mut archive = ZipArchive::new(reader)?;

        // Parse and validate everything before touching the database.
        let products: Vec<Product> = read_table(&mut archive, "products.csv", PRODUCT_COLUMNS)?;
        let inventory: Vec<Inventory> =
            read_table(&mut archive, "inventory.csv", INVENTORY_COLUMNS)?;
        let sales: Vec<Sale> = read_table(&mut archive, "sales.csv", SALE_COLUMNS)?;
        let line_items: Vec<SaleLineItem> =
            read_table(&mut archive, "sale_line_items.csv", LINE_ITEM_COLUMNS)?;
        let expenses: Vec<Expense> = read_table(&mut archive, "expenses.csv", EXPENSE_COLUMNS)?;

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        // Children before parents.
        for table in [
            "sale_line_items",
            "inventory",
            "sales",
            "expenses",
            "products",
        ] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await
                .map_err(DbError::from)?;
        }

        for p in &products {
            sqlx::query(
                r#"
                INSERT INTO products (id, name, description, purchase_price_cents, sale_price_cents, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(p.id)
            .bind(&p.name)
            .bind(&p.description)
            .bind(p.purchase_price_cents)
            .bind(p.sale_price_cents)
            .bind(p.created_at)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;
        }

        for inv in &inventory {
            sqlx::query(
                r#"
                INSERT INTO inventory (id, product_id, quantity, last_updated)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(inv.id)
            .bind(inv.product_id)
            .bind(inv.quantity)
            .bind(inv.last_updated)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;
        }

        for sale in &sales {
            sqlx::query("INSERT INTO sales (id, sold_at, total_cents) VALUES (?1, ?2, ?3)")
                .bind(sale.id)
                .bind(sale.sold_at)
                .bind(sale.total_cents)
                .execute(&mut *tx)
                .await
                .map_err(DbError::from)?;
        }

        for li in &line_items {
            sqlx::query(
                r#"
                INSERT INTO sale_line_items (id, sale_id, product_id, quantity, unit_price_cents)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(li.id)
            .bind(li.sale_id)
            .bind(li.product_id)
            .bind(li.quantity)
            .bind(li.unit_price_cents)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;
        }

        for e in &expenses {
            sqlx::query(
                r#"
                INSERT INTO expenses (id, description, amount_cents, incurred_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(e.id)
            .bind(&e.description)
            .bind(e.amount_cents)
            .bind(e.incurred_at)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            products = products.len(),
            sales = sales.len(),
            expenses = expenses.len(),
            "backup imported"
        );

        Ok(())
    }

    /// Restores the store from a ZIP file at `path`.
    pub async fn import_from_file(&self, path: impl AsRef<Path>) -> Result<(), BackupError> {
        let file = File::open(path)?;
        self.import_from_reader(file).await
    }
}

/// Writes one table as a CSV entry in the archive. The header row is
/// written explicitly so empty tables still carry one.
fn write_table<W, T>(
    zip: &mut ZipWriter<W>,
    options: SimpleFileOptions,
    name: &str,
    columns: &[&str],
    rows: &[T],
) -> Result<(), BackupError>
where
    W: Write + Seek,
    T: Serialize,
{
    zip.start_file(name, options)?;

    let mut buf = Vec::new();
    {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buf);
        wtr.write_record(columns).map_err(|source| BackupError::Csv {
            table: name.to_string(),
            source,
        })?;
        for row in rows {
            wtr.serialize(row).map_err(|source| BackupError::Csv {
                table: name.to_string(),
                source,
            })?;
        }
        wtr.flush()?;
    }

    zip.write_all(&buf)?;
    Ok(())
}

/// Reads one table CSV out of the archive, checking the header against
/// the table's schema before deserializing any rows.
fn read_table<R, T>(
    archive: &mut ZipArchive<R>,
    name: &str,
    columns: &[&str],
) -> Result<Vec<T>, BackupError>
where
    R: Read + Seek,
    T: DeserializeOwned,
{
    let file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => {
            return Err(BackupError::MissingTable {
                table: name.to_string(),
            })
        }
        Err(err) => return Err(err.into()),
    };

    let mut rdr = csv::Reader::from_reader(file);

    let headers = rdr
        .headers()
        .map_err(|source| BackupError::Csv {
            table: name.to_string(),
            source,
        })?
        .clone();

    for header in headers.iter() {
        if !columns.contains(&header) {
            return Err(BackupError::UnknownColumn {
                table: name.to_string(),
                column: header.to_string(),
            });
        }
    }
    for column in columns {
        if !headers.iter().any(|h| h == *column) {
            return Err(BackupError::MissingColumn {
                table: name.to_string(),
                column: column.to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for record in rdr.deserialize() {
        let row: T = record.map_err(|source| BackupError::Csv {
            table: name.to_string(),
            source,
        })?;
        rows.push(row);
    }

    Ok(rows)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use cantina_core::{Cart, NewProduct};
    use chrono::{Duration, Utc};
    use std::io::Cursor;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn product(name: &str, purchase: i64, sale: i64, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: Some(format!("{name} description")),
            purchase_price_cents: purchase,
            sale_price_cents: sale,
            initial_quantity: stock,
        }
    }

    async fn populate(db: &Database) {
        let a = db
            .catalog()
            .create_product(&product("Papas", 200, 500, 10))
            .await
            .unwrap();
        let b = db
            .catalog()
            .create_product(&product("Jugo", 300, 700, 5))
            .await
            .unwrap();

        let mut cart = Cart::new();
        cart.add_item(&a, 10, 3).unwrap();
        cart.add_item(&b, 5, 1).unwrap();
        db.checkout().finalize(&mut cart).await.unwrap();

        db.expenses().record("Bolsas", 450).await.unwrap();
    }

    fn build_archive(files: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, content) in files {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap()
    }

    #[tokio::test]
    async fn test_round_trip_preserves_everything() {
        let source = test_db().await;
        populate(&source).await;

        let mut buf = Cursor::new(Vec::new());
        source.backup().export_to_writer(&mut buf).await.unwrap();
        buf.set_position(0);

        let target = test_db().await;
        target.backup().import_from_reader(buf).await.unwrap();

        let original = source.catalog().list_with_stock().await.unwrap();
        let restored = target.catalog().list_with_stock().await.unwrap();
        assert_eq!(original, restored);

        let now = Utc::now();
        let range = (now - Duration::hours(1), now + Duration::hours(1));
        let sales_a = source.sales().list_in_range(range.0, range.1).await.unwrap();
        let sales_b = target.sales().list_in_range(range.0, range.1).await.unwrap();
        assert_eq!(sales_a, sales_b);

        let items_a = source.sales().line_items(sales_a[0].id).await.unwrap();
        let items_b = target.sales().line_items(sales_b[0].id).await.unwrap();
        assert_eq!(items_a, items_b);

        let exp_a = source.expenses().list_in_range(range.0, range.1).await.unwrap();
        let exp_b = target.expenses().list_in_range(range.0, range.1).await.unwrap();
        assert_eq!(exp_a, exp_b);
    }

    #[tokio::test]
    async fn test_import_replaces_existing_data() {
        let source = test_db().await;
        populate(&source).await;

        let mut buf = Cursor::new(Vec::new());
        source.backup().export_to_writer(&mut buf).await.unwrap();
        buf.set_position(0);

        let target = test_db().await;
        target
            .catalog()
            .create_product(&product("Preexistente", 100, 200, 1))
            .await
            .unwrap();

        target.backup().import_from_reader(buf).await.unwrap();

        let names: Vec<String> = target
            .catalog()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert!(!names.contains(&"Preexistente".to_string()));
        assert_eq!(names.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_store_round_trips() {
        let source = test_db().await;

        let mut buf = Cursor::new(Vec::new());
        source.backup().export_to_writer(&mut buf).await.unwrap();
        buf.set_position(0);

        let target = test_db().await;
        populate(&target).await;
        target.backup().import_from_reader(buf).await.unwrap();

        assert_eq!(target.catalog().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_column_rejects_archive_untouched() {
        let archive = build_archive(&[
            (
                "products.csv",
                "id,name,description,purchase_price_cents,sale_price_cents,created_at,color\n",
            ),
            ("inventory.csv", "id,product_id,quantity,last_updated\n"),
            ("sales.csv", "id,sold_at,total_cents\n"),
            (
                "sale_line_items.csv",
                "id,sale_id,product_id,quantity,unit_price_cents\n",
            ),
            ("expenses.csv", "id,description,amount_cents,incurred_at\n"),
        ]);

        let db = test_db().await;
        populate(&db).await;
        let before = db.catalog().count().await.unwrap();

        let err = db.backup().import_from_reader(archive).await.unwrap_err();
        assert!(matches!(
            err,
            BackupError::UnknownColumn { ref column, .. } if column == "color"
        ));

        assert_eq!(db.catalog().count().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_missing_column_rejected() {
        let archive = build_archive(&[
            (
                "products.csv",
                "id,name,description,purchase_price_cents,created_at\n",
            ),
            ("inventory.csv", "id,product_id,quantity,last_updated\n"),
            ("sales.csv", "id,sold_at,total_cents\n"),
            (
                "sale_line_items.csv",
                "id,sale_id,product_id,quantity,unit_price_cents\n",
            ),
            ("expenses.csv", "id,description,amount_cents,incurred_at\n"),
        ]);

        let db = test_db().await;
        let err = db.backup().import_from_reader(archive).await.unwrap_err();
        assert!(matches!(
            err,
            BackupError::MissingColumn { ref column, .. } if column == "sale_price_cents"
        ));
    }

    #[tokio::test]
    async fn test_missing_table_rejected() {
        let archive = build_archive(&[(
            "products.csv",
            "id,name,description,purchase_price_cents,sale_price_cents,created_at\n",
        )]);

        let db = test_db().await;
        let err = db.backup().import_from_reader(archive).await.unwrap_err();
        assert!(matches!(err, BackupError::MissingTable { .. }));
    }

    #[tokio::test]
    async fn test_export_and_import_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.zip");

        let source = test_db().await;
        populate(&source).await;
        source.backup().export_to_file(&path).await.unwrap();

        let target = test_db().await;
        target.backup().import_from_file(&path).await.unwrap();
        assert_eq!(target.catalog().count().await.unwrap(), 2);
    }
}

//! # cantina-db: Database Layer for Cantina
//!
//! SQLite persistence for the school snack store: repositories, the
//! checkout transaction, reporting queries, backup, and the cash ledger.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Cantina Data Flow                         │
//! │                                                                 │
//! │  Caller (UI / seed / tests)                                     │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │                 cantina-db (THIS CRATE)                   │  │
//! │  │                                                           │  │
//! │  │  ┌──────────┐  ┌──────────────┐  ┌─────────────────────┐  │  │
//! │  │  │ Database │  │ Repositories │  │ Checkout / Backup / │  │  │
//! │  │  │ (pool)   │◄─│ catalog,sale │  │ CashLedger          │  │  │
//! │  │  │          │  │ expense,rpt  │  │                     │  │  │
//! │  │  └──────────┘  └──────────────┘  └─────────────────────┘  │  │
//! │  └───────────────────────────┬───────────────────────────────┘  │
//! │                              │                                  │
//! │                              ▼                                  │
//! │                     SQLite database file                        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`checkout`] - The atomic sale transaction
//! - [`backup`] - CSV/ZIP export and destructive import
//! - [`cash_ledger`] - File-backed daily cash balance
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cantina_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("data/cantina.db")).await?;
//!
//! let mut cart = cantina_core::Cart::new();
//! for offer in db.catalog().list_in_stock().await? { /* ... */ }
//! let sale = db.checkout().finalize(&mut cart).await?;
//! ```

pub mod backup;
pub mod cash_ledger;
pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use backup::{Backup, BackupError};
pub use cash_ledger::{CashLedger, CashLedgerError};
pub use checkout::{Checkout, CheckoutError};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::expense::ExpenseRepository;
pub use repository::report::ReportRepository;
pub use repository::sale::SaleRepository;

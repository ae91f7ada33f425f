//! # Repository Module
//!
//! Database repository implementations for Cantina.
//!
//! Each repository wraps the pool behind a per-concern API; SQL lives
//! here and nowhere else. Everything outside [`crate::checkout`] and
//! [`crate::backup`] is single-row CRUD or read-only aggregation.
//!
//! ## Available Repositories
//!
//! - [`catalog::CatalogRepository`] - products + inventory (1:1 lifecycle)
//! - [`sale::SaleRepository`] - read access to the sale ledger
//! - [`expense::ExpenseRepository`] - expense entries
//! - [`report::ReportRepository`] - range-parametrized aggregations

pub mod catalog;
pub mod expense;
pub mod report;
pub mod sale;

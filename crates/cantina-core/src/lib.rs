//! # cantina-core: Pure Business Logic for Cantina
//!
//! This crate is the **heart** of Cantina, a small retail-management system
//! for a school snack store. It contains all business logic as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Cantina Architecture                        │
//! │                                                                 │
//! │  ┌───────────────────────────────────────────────────────────┐ │
//! │  │              ★ cantina-core (THIS CRATE) ★                │ │
//! │  │                                                           │ │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌────────────┐      │ │
//! │  │  │  types  │ │  money  │ │  cart   │ │ validation │      │ │
//! │  │  │ Product │ │  Money  │ │  Cart   │ │   rules    │      │ │
//! │  │  │  Sale   │ │  cents  │ │CartLine │ │   checks   │      │ │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └────────────┘      │ │
//! │  │                                                           │ │
//! │  │  NO I/O • NO DATABASE • PURE FUNCTIONS                    │ │
//! │  └───────────────────────────┬───────────────────────────────┘ │
//! │                              │                                  │
//! │  ┌───────────────────────────▼───────────────────────────────┐ │
//! │  │               cantina-db (Database Layer)                 │ │
//! │  │     SQLite repositories, checkout transaction, backup     │ │
//! │  └───────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Product, Inventory, Sale, Expense, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The session-scoped cart that feeds checkout
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output
//! 2. **No I/O**: database and file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64)
//! 4. **Explicit Errors**: typed errors, never strings or panics
//! 5. **No ambient state**: the cart is an explicit value owned by the
//!    caller's session, not a global

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// Re-exports for convenience: `use cantina_core::Money` instead of
// `use cantina_core::money::Money`.
pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Maximum quantity of a single product in one cart line.
///
/// Prevents accidental over-ordering (e.g. typing 100 instead of 10) at a
/// counter that sells by the piece.
pub const MAX_LINE_QUANTITY: i64 = 999;

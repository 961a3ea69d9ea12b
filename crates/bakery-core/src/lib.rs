//! # bakery-core: Pure Domain Logic for Bakery Manager
//!
//! This crate holds the domain entities of the bakery and the few
//! calculations that carry invariants. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Bakery Manager Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  bakery CLI (apps/cli)                          │   │
//! │  │    Products ─ Customers ─ Orders ─ Stock ─ Reports menus        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bakery-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  report   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Summary  │  │   rules   │  │   │
//! │  │   │   Order   │  │  parsing  │  │  grouping │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  bakery-db (Database Layer)                     │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Product, Customer, Order, OrderLine, StockItem)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules checked before anything is written
//! - [`report`] - Aggregations over listed orders and stock
//!
//! ## Example Usage
//!
//! ```rust
//! use bakery_core::{Money, OrderLine};
//!
//! let line = OrderLine::new(1, 3, Money::from_cents(5000), None);
//! assert_eq!(line.subtotal(), Money::from_cents(15000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single product on one order line.
///
/// ## Business Reason
/// Catches typing mistakes (1000 instead of 10) at the shell.
pub const MAX_LINE_QUANTITY: i64 = 9_999;

/// Highest accepted unit price, in cents ($1,000,000.00).
///
/// Keeps `MAX_PRICE_CENTS * MAX_LINE_QUANTITY`, and the sum of many such
/// lines, far inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Number of products shown in the "best sellers" part of the sales summary.
pub const DEFAULT_TOP_PRODUCTS: usize = 5;

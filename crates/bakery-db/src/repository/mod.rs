//! # Repository Module
//!
//! One repository per stored entity type.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Shared Repository Contract                           │
//! │                                                                         │
//! │  Shell / demo / report                                                 │
//! │       │                                                                 │
//! │       │  db.products().get(7)                                          │
//! │       ▼                                                                 │
//! │  XxxRepository                                                         │
//! │  ├── create(&entity) -> id        validates, inserts                   │
//! │  ├── get(id)         -> Option    None for unknown ids                 │
//! │  ├── list()          -> Vec       by name (orders: by delivery time)   │
//! │  ├── update(&entity) -> bool      full replace, false if no such row   │
//! │  ├── delete(id)      -> bool      hard delete, false if no such row    │
//! │  └── count()         -> i64                                            │
//! │       │                                                                 │
//! │       │  runtime-checked SQL, rows mapped through FromRow structs      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Products
//! - [`CustomerRepository`](customer::CustomerRepository) - Customers
//! - [`OrderRepository`](order::OrderRepository) - Orders with their lines
//! - [`StockRepository`](stock::StockRepository) - Ingredient stock

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::{DbError, DbResult};

pub mod customer;
pub mod order;
pub mod product;
pub mod stock;

/// Starts a transaction on the pool.
///
/// Everything done inside must go through the transaction handle; a second
/// acquire on a single-connection pool would wait forever.
pub(crate) async fn begin(pool: &SqlitePool) -> DbResult<Transaction<'static, Sqlite>> {
    pool.begin()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))
}

/// Commits a transaction started with [`begin`].
pub(crate) async fn commit(tx: Transaction<'_, Sqlite>) -> DbResult<()> {
    tx.commit()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))
}

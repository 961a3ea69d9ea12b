//! # Stock Repository
//!
//! Database operations for ingredient stock. Quantities only change when
//! someone sets them; orders never consume stock.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use bakery_core::validation::validate_stock_amount;
use bakery_core::{EntityId, StockItem};

#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    id: i64,
    name: String,
    unit: String,
    quantity: f64,
    minimum: f64,
}

impl From<StockRow> for StockItem {
    fn from(row: StockRow) -> Self {
        StockItem {
            id: Some(row.id),
            name: row.name,
            unit: row.unit,
            quantity: row.quantity,
            minimum: row.minimum,
        }
    }
}

/// Repository for stock item database operations.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Inserts a stock item and returns its assigned id.
    pub async fn create(&self, item: &StockItem) -> DbResult<EntityId> {
        item.validate()?;

        let result = sqlx::query(
            r#"
            INSERT INTO stock_items (name, unit, quantity, minimum)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&item.name)
        .bind(&item.unit)
        .bind(item.quantity)
        .bind(item.minimum)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(id, name = %item.name, "Stock item created");
        Ok(id)
    }

    /// Gets a stock item by ID; `None` if there is none.
    pub async fn get(&self, id: EntityId) -> DbResult<Option<StockItem>> {
        let row = sqlx::query_as::<_, StockRow>(
            "SELECT id, name, unit, quantity, minimum FROM stock_items WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StockItem::from))
    }

    /// Lists all stock items by name.
    pub async fn list(&self) -> DbResult<Vec<StockItem>> {
        let rows = sqlx::query_as::<_, StockRow>(
            "SELECT id, name, unit, quantity, minimum FROM stock_items ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StockItem::from).collect())
    }

    /// Items at or below their minimum, by name.
    ///
    /// The threshold is evaluated on read, so it always reflects the
    /// current quantities.
    pub async fn list_low_stock(&self) -> DbResult<Vec<StockItem>> {
        let rows = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT id, name, unit, quantity, minimum
            FROM stock_items
            WHERE quantity <= minimum
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Low stock items");
        Ok(rows.into_iter().map(StockItem::from).collect())
    }

    /// Full replace by id. `Ok(false)` when no item has that id.
    pub async fn update(&self, item: &StockItem) -> DbResult<bool> {
        let Some(id) = item.id else {
            return Ok(false);
        };
        item.validate()?;

        let result = sqlx::query(
            r#"
            UPDATE stock_items SET
                name = ?2,
                unit = ?3,
                quantity = ?4,
                minimum = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&item.name)
        .bind(&item.unit)
        .bind(item.quantity)
        .bind(item.minimum)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Sets the amount on hand, leaving every other field alone.
    pub async fn set_quantity(&self, id: EntityId, quantity: f64) -> DbResult<bool> {
        validate_stock_amount("quantity", quantity)?;
        debug!(id, quantity, "Setting stock quantity");

        let result = sqlx::query("UPDATE stock_items SET quantity = ?2 WHERE id = ?1")
            .bind(id)
            .bind(quantity)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a stock item. Nothing references stock, so this never refuses.
    pub async fn delete(&self, id: EntityId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM stock_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of stored stock items.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM stock_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

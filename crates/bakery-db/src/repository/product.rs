//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Price Changes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products.price_cents         order_lines.unit_price_cents             │
//! │  ─────────────────────        ──────────────────────────────           │
//! │  Brownie  600  ──(order)──►   line #1   600                            │
//! │     │                                                                   │
//! │  update(price 900)                                                     │
//! │     ▼                                                                   │
//! │  Brownie  900                 line #1   600   ← unchanged              │
//! │                                                                         │
//! │  Existing orders keep their value; only new lines pick up 900.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::{begin, commit};
use bakery_core::{EntityId, Money, Product};

/// Row shape of the `products` table.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price_cents: i64,
    prep_minutes: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: Some(row.id),
            name: row.name,
            description: row.description,
            price: Money::from_cents(row.price_cents),
            prep_minutes: row.prep_minutes,
        }
    }
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product and returns its assigned id.
    ///
    /// Any id already set on `product` is ignored.
    pub async fn create(&self, product: &Product) -> DbResult<EntityId> {
        product.validate()?;
        debug!(name = %product.name, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, description, price_cents, prep_minutes)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.cents())
        .bind(product.prep_minutes)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(id, name = %product.name, "Product created");
        Ok(id)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get(&self, id: EntityId) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, price_cents, prep_minutes
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Lists all products by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, price_cents, prep_minutes
            FROM products
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Replaces every field of the stored product with `product`'s.
    ///
    /// ## Returns
    /// * `Ok(true)` - Row replaced
    /// * `Ok(false)` - No product with that id (or `product.id` is `None`)
    pub async fn update(&self, product: &Product) -> DbResult<bool> {
        let Some(id) = product.id else {
            return Ok(false);
        };
        product.validate()?;
        debug!(id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                prep_minutes = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.cents())
        .bind(product.prep_minutes)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a product.
    ///
    /// ## Returns
    /// * `Ok(true)` - Product deleted
    /// * `Ok(false)` - No product with that id
    /// * `Err(DbError::StillReferenced)` - Some order line uses it
    pub async fn delete(&self, id: EntityId) -> DbResult<bool> {
        let mut tx = begin(&self.pool).await?;

        let lines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_lines WHERE product_id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if lines > 0 {
            return Err(DbError::StillReferenced {
                entity: "Product".to_string(),
                id,
                dependents: lines,
                dependent_kind: "order line(s)".to_string(),
            });
        }

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        commit(tx).await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(id, "Product deleted");
        }
        Ok(deleted)
    }

    /// Number of stored products.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> ProductRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().products()
    }

    fn cake() -> Product {
        Product::new("Bolo de Chocolate", "Chocolate cake", Money::from_cents(5000), 120)
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let repo = repo().await;

        let id = repo.create(&cake()).await.unwrap();
        let stored = repo.get(id).await.unwrap().unwrap();

        assert_eq!(stored, Product { id: Some(id), ..cake() });
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let repo = repo().await;
        assert!(repo.get(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let repo = repo().await;
        for name in ["Torta de Limão", "Brownie", "Cupcake Red Velvet"] {
            repo.create(&Product::new(name, "", Money::from_cents(100), 10))
                .await
                .unwrap();
        }

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Brownie", "Cupcake Red Velvet", "Torta de Limão"]);
    }

    #[tokio::test]
    async fn test_update_replaces_and_is_idempotent() {
        let repo = repo().await;
        let id = repo.create(&cake()).await.unwrap();

        let mut changed = repo.get(id).await.unwrap().unwrap();
        changed.price = Money::from_cents(5500);
        changed.description = "Double chocolate".to_string();

        assert!(repo.update(&changed).await.unwrap());
        assert!(repo.update(&changed).await.unwrap());
        assert_eq!(repo.get(id).await.unwrap().unwrap(), changed);
    }

    #[tokio::test]
    async fn test_update_missing_returns_false() {
        let repo = repo().await;

        let ghost = Product { id: Some(42), ..cake() };
        assert!(!repo.update(&ghost).await.unwrap());
        assert!(!repo.update(&cake()).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_product_is_rejected() {
        let repo = repo().await;

        let bad = Product::new("", "", Money::from_cents(100), 0);
        let err = repo.create(&bad).await.unwrap_err();

        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        let id = repo.create(&cake()).await.unwrap();

        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
        assert!(repo.get(id).await.unwrap().is_none());
    }
}

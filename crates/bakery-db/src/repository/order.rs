//! # Order Repository
//!
//! Database operations for orders and the lines they own.
//!
//! ## Order Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  create / update / delete (one transaction)             │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├── customer exists?            no ──► ForeignKeyViolation           │
//! │    ├── every line's product exists? no ──► ForeignKeyViolation          │
//! │    │                                        (ROLLBACK, nothing written) │
//! │    ├── INSERT/UPDATE orders                                             │
//! │    ├── (update) DELETE order_lines WHERE order_id = ?                   │
//! │    └── INSERT order_lines ...                                           │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Readers either see the whole order with all its lines, or nothing.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are not stored. `get` and `list` rebuild each order with its lines
//! and `Order::total()` sums them on demand.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::{begin, commit};
use bakery_core::{EntityId, Money, Order, OrderLine, OrderStatus};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_id: i64,
    placed_at: DateTime<Utc>,
    deliver_at: DateTime<Utc>,
    status: OrderStatus,
    notes: Option<String>,
}

impl OrderRow {
    fn into_order(self, lines: Vec<OrderLine>) -> Order {
        Order {
            id: Some(self.id),
            customer_id: self.customer_id,
            placed_at: self.placed_at,
            deliver_at: self.deliver_at,
            status: self.status,
            notes: self.notes,
            lines,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LineRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    quantity: i64,
    unit_price_cents: i64,
    notes: Option<String>,
}

impl From<LineRow> for OrderLine {
    fn from(row: LineRow) -> Self {
        OrderLine {
            id: Some(row.id),
            order_id: Some(row.order_id),
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price: Money::from_cents(row.unit_price_cents),
            notes: row.notes,
        }
    }
}

/// Repository for order database operations.
///
/// ## Usage
/// ```rust,ignore
/// let mut order = Order::new(customer_id, Utc::now(), deliver_at);
/// order.add_line(OrderLine::for_product(&cake, 2, None)?);
/// let id = db.orders().create(&order).await?;
///
/// let pending = db.orders().list(Some(OrderStatus::Pending)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order and all of its lines atomically.
    ///
    /// Ids already set on the order or its lines are ignored.
    ///
    /// ## Errors
    /// * `DbError::Validation` - quantity not positive, bad notes, ...
    /// * `DbError::ForeignKeyViolation` - unknown customer or product;
    ///   no rows are written
    pub async fn create(&self, order: &Order) -> DbResult<EntityId> {
        order.validate()?;
        debug!(customer_id = order.customer_id, lines = order.lines.len(), "Inserting order");

        let mut tx = begin(&self.pool).await?;
        check_references(&mut *tx, order).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO orders (customer_id, placed_at, deliver_at, status, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(order.customer_id)
        .bind(order.placed_at)
        .bind(order.deliver_at)
        .bind(order.status)
        .bind(&order.notes)
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();
        insert_lines(&mut *tx, id, &order.lines).await?;
        commit(tx).await?;

        info!(id, total = %order.total(), "Order created");
        Ok(id)
    }

    /// Gets an order with its lines; `None` if there is none.
    pub async fn get(&self, id: EntityId) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, customer_id, placed_at, deliver_at, status, notes
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let lines = self.lines_for(row.id).await?;
                Ok(Some(row.into_order(lines)))
            }
            None => Ok(None),
        }
    }

    /// Lists orders by delivery time, optionally only those with `status`.
    pub async fn list(&self, status: Option<OrderStatus>) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, customer_id, placed_at, deliver_at, status, notes
            FROM orders
            WHERE ?1 IS NULL OR status = ?1
            ORDER BY deliver_at, id
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), status = ?status, "Listed orders");

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let lines = self.lines_for(row.id).await?;
            orders.push(row.into_order(lines));
        }
        Ok(orders)
    }

    /// Lines of one order, in insertion order. Empty for an unknown order.
    pub async fn lines_for(&self, order_id: EntityId) -> DbResult<Vec<OrderLine>> {
        let rows = sqlx::query_as::<_, LineRow>(
            r#"
            SELECT id, order_id, product_id, quantity, unit_price_cents, notes
            FROM order_lines
            WHERE order_id = ?1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderLine::from).collect())
    }

    /// Replaces the order row and its whole set of lines atomically.
    ///
    /// The stored lines are dropped and `order.lines` written in their place,
    /// so line ids change. Unit prices are taken from `order.lines` as given.
    ///
    /// ## Returns
    /// * `Ok(true)` - Order replaced
    /// * `Ok(false)` - No order with that id (or `order.id` is `None`),
    ///   whatever the lines hold
    /// * `Err(DbError::Validation)` - Order exists but a field or line is invalid
    pub async fn update(&self, order: &Order) -> DbResult<bool> {
        let Some(id) = order.id else {
            return Ok(false);
        };

        let mut tx = begin(&self.pool).await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM orders WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(false);
        }
        order.validate()?;
        check_references(&mut *tx, order).await?;

        sqlx::query(
            r#"
            UPDATE orders SET
                customer_id = ?2,
                placed_at = ?3,
                deliver_at = ?4,
                status = ?5,
                notes = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(order.customer_id)
        .bind(order.placed_at)
        .bind(order.deliver_at)
        .bind(order.status)
        .bind(&order.notes)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM order_lines WHERE order_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_lines(&mut *tx, id, &order.lines).await?;
        commit(tx).await?;

        info!(id, lines = order.lines.len(), "Order updated");
        Ok(true)
    }

    /// Changes only the status of an order.
    pub async fn update_status(&self, id: EntityId, status: OrderStatus) -> DbResult<bool> {
        let result = sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        let updated = result.rows_affected() > 0;
        if updated {
            info!(id, status = %status, "Order status changed");
        }
        Ok(updated)
    }

    /// Deletes an order and its lines atomically.
    pub async fn delete(&self, id: EntityId) -> DbResult<bool> {
        let mut tx = begin(&self.pool).await?;

        let lines = sqlx::query("DELETE FROM order_lines WHERE order_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        commit(tx).await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(id, lines, "Order deleted");
        } else if lines > 0 {
            warn!(order_id = id, lines, "Removed order lines with no order");
        }
        Ok(deleted)
    }

    /// Number of stored orders.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Transaction Helpers
// =============================================================================

/// Fails unless the order's customer and every line's product exist.
async fn check_references(conn: &mut SqliteConnection, order: &Order) -> DbResult<()> {
    let customer: Option<i64> = sqlx::query_scalar("SELECT id FROM customers WHERE id = ?1")
        .bind(order.customer_id)
        .fetch_optional(&mut *conn)
        .await?;
    if customer.is_none() {
        return Err(DbError::missing_reference(format!(
            "customer {} does not exist",
            order.customer_id
        )));
    }

    for line in &order.lines {
        let product: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?1")
            .bind(line.product_id)
            .fetch_optional(&mut *conn)
            .await?;
        if product.is_none() {
            return Err(DbError::missing_reference(format!(
                "product {} does not exist",
                line.product_id
            )));
        }
    }

    Ok(())
}

async fn insert_lines(conn: &mut SqliteConnection, order_id: EntityId, lines: &[OrderLine]) -> DbResult<()> {
    for line in lines {
        sqlx::query(
            r#"
            INSERT INTO order_lines (order_id, product_id, quantity, unit_price_cents, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(order_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price.cents())
        .bind(&line.notes)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use bakery_core::{Customer, Product};
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap()
    }

    struct Fixture {
        db: Database,
        customer: EntityId,
        cake: Product,
        brigadeiro: Product,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = db
            .customers()
            .create(&Customer::new("Maria Silva", "11999999999"))
            .await
            .unwrap();

        let mut cake = Product::new("Bolo de Chocolate", "", Money::from_cents(5000), 120);
        cake.id = Some(db.products().create(&cake).await.unwrap());
        let mut brigadeiro = Product::new("Brigadeiro Gourmet", "", Money::from_cents(350), 15);
        brigadeiro.id = Some(db.products().create(&brigadeiro).await.unwrap());

        Fixture { db, customer, cake, brigadeiro }
    }

    fn order_for(fx: &Fixture, deliver_at: DateTime<Utc>) -> Order {
        let mut order = Order::new(fx.customer, at(1, 8), deliver_at).with_notes("morning");
        order.add_line(OrderLine::for_product(&fx.cake, 2, None).unwrap());
        order.add_line(OrderLine::for_product(&fx.brigadeiro, 50, Some("gift box".into())).unwrap());
        order
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips_lines() {
        let fx = fixture().await;
        let order = order_for(&fx, at(3, 9));

        let id = fx.db.orders().create(&order).await.unwrap();
        let stored = fx.db.orders().get(id).await.unwrap().unwrap();

        assert_eq!(stored.id, Some(id));
        assert_eq!(stored.customer_id, order.customer_id);
        assert_eq!(stored.placed_at, order.placed_at);
        assert_eq!(stored.deliver_at, order.deliver_at);
        assert_eq!(stored.status, OrderStatus::Pending);
        assert_eq!(stored.notes.as_deref(), Some("morning"));
        assert_eq!(stored.lines.len(), 2);
        assert_eq!(stored.lines[1].notes.as_deref(), Some("gift box"));
        assert!(stored.lines.iter().all(|l| l.order_id == Some(id)));
        assert_eq!(stored.total(), Money::from_cents(2 * 5000 + 50 * 350));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let fx = fixture().await;
        assert!(fx.db.orders().get(77).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_product_leaves_nothing_behind() {
        let fx = fixture().await;
        let mut order = order_for(&fx, at(3, 9));
        order.add_line(OrderLine::new(999, 1, Money::from_cents(100), None));

        let err = fx.db.orders().create(&order).await.unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(fx.db.orders().count().await.unwrap(), 0);
        let stray: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_lines")
            .fetch_one(fx.db.pool())
            .await
            .unwrap();
        assert_eq!(stray, 0);
    }

    #[tokio::test]
    async fn test_unknown_customer_is_rejected() {
        let fx = fixture().await;
        let order = Order::new(404, at(1, 8), at(2, 8));

        let err = fx.db.orders().create(&order).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_zero_quantity_is_rejected() {
        let fx = fixture().await;
        let mut order = Order::new(fx.customer, at(1, 8), at(2, 8));
        order.add_line(OrderLine::for_product(&fx.cake, 0, None).unwrap());

        let err = fx.db.orders().create(&order).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_status_filter_in_delivery_order() {
        let fx = fixture().await;
        let orders = fx.db.orders();

        let late = orders.create(&order_for(&fx, at(5, 9))).await.unwrap();
        let ready = orders
            .create(&order_for(&fx, at(2, 9)).with_status(OrderStatus::Ready))
            .await
            .unwrap();
        let early = orders.create(&order_for(&fx, at(3, 9))).await.unwrap();

        let pending: Vec<_> = orders
            .list(Some(OrderStatus::Pending))
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id.unwrap())
            .collect();
        assert_eq!(pending, vec![early, late]);

        let all: Vec<_> = orders.list(None).await.unwrap().into_iter().map(|o| o.id.unwrap()).collect();
        assert_eq!(all, vec![ready, early, late]);

        assert!(orders.list(Some(OrderStatus::Cancelled)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_lines() {
        let fx = fixture().await;
        let orders = fx.db.orders();
        let id = orders.create(&order_for(&fx, at(3, 9))).await.unwrap();

        let mut order = orders.get(id).await.unwrap().unwrap();
        order.lines = vec![OrderLine::for_product(&fx.cake, 1, None).unwrap()];
        order.status = OrderStatus::InProduction;
        order.notes = None;

        assert!(orders.update(&order).await.unwrap());
        assert!(orders.update(&order).await.unwrap());

        let stored = orders.get(id).await.unwrap().unwrap();
        assert_eq!(stored.lines.len(), 1);
        assert_eq!(stored.status, OrderStatus::InProduction);
        assert_eq!(stored.notes, None);
        assert_eq!(stored.total(), Money::from_cents(5000));
    }

    #[tokio::test]
    async fn test_update_missing_order_returns_false() {
        let fx = fixture().await;
        let mut ghost = order_for(&fx, at(3, 9));
        ghost.id = Some(31);

        assert!(!fx.db.orders().update(&ghost).await.unwrap());
        ghost.customer_id = 404;
        assert!(!fx.db.orders().update(&ghost).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_order_with_invalid_line_returns_false() {
        let fx = fixture().await;
        let mut ghost = order_for(&fx, at(3, 9));
        ghost.id = Some(31);
        ghost.add_line(OrderLine::new(fx.cake.id.unwrap(), 0, Money::from_cents(5000), None));

        assert!(!fx.db.orders().update(&ghost).await.unwrap());

        let id = fx.db.orders().create(&order_for(&fx, at(3, 9))).await.unwrap();
        ghost.id = Some(id);
        let err = fx.db.orders().update(&ghost).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_old_order() {
        let fx = fixture().await;
        let orders = fx.db.orders();
        let id = orders.create(&order_for(&fx, at(3, 9))).await.unwrap();

        let mut order = orders.get(id).await.unwrap().unwrap();
        order.lines.push(OrderLine::new(999, 1, Money::from_cents(100), None));
        order.status = OrderStatus::Delivered;

        let err = orders.update(&order).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let stored = orders.get(id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
        assert_eq!(stored.lines.len(), 2);
    }

    #[tokio::test]
    async fn test_update_status_only() {
        let fx = fixture().await;
        let orders = fx.db.orders();
        let id = orders.create(&order_for(&fx, at(3, 9))).await.unwrap();

        assert!(orders.update_status(id, OrderStatus::Delivered).await.unwrap());
        assert!(!orders.update_status(999, OrderStatus::Delivered).await.unwrap());

        let stored = orders.get(id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Delivered);
        assert_eq!(stored.lines.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_removes_lines() {
        let fx = fixture().await;
        let orders = fx.db.orders();
        let id = orders.create(&order_for(&fx, at(3, 9))).await.unwrap();

        assert!(orders.delete(id).await.unwrap());

        assert!(orders.get(id).await.unwrap().is_none());
        assert!(orders.lines_for(id).await.unwrap().is_empty());
        assert!(!orders.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_price_change_keeps_line_price() {
        let fx = fixture().await;
        let id = fx.db.orders().create(&order_for(&fx, at(3, 9))).await.unwrap();

        let mut cake = fx.cake.clone();
        cake.price = Money::from_cents(9900);
        assert!(fx.db.products().update(&cake).await.unwrap());

        let stored = fx.db.orders().get(id).await.unwrap().unwrap();
        assert_eq!(stored.lines[0].unit_price, Money::from_cents(5000));
    }

    #[tokio::test]
    async fn test_referenced_customer_and_product_cannot_be_deleted() {
        let fx = fixture().await;
        let id = fx.db.orders().create(&order_for(&fx, at(3, 9))).await.unwrap();

        let err = fx.db.customers().delete(fx.customer).await.unwrap_err();
        assert!(matches!(err, DbError::StillReferenced { dependents: 1, .. }));
        let err = fx.db.products().delete(fx.cake.id.unwrap()).await.unwrap_err();
        assert!(matches!(err, DbError::StillReferenced { .. }));

        assert!(fx.db.orders().delete(id).await.unwrap());
        assert!(fx.db.customers().delete(fx.customer).await.unwrap());
        assert!(fx.db.products().delete(fx.cake.id.unwrap()).await.unwrap());
    }
}

//! # Customer Repository
//!
//! Database operations for customers. A customer with orders cannot be
//! deleted until those orders are gone.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::{begin, commit};
use bakery_core::{Customer, EntityId};

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    name: String,
    phone: String,
    email: Option<String>,
    address: Option<String>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: Some(row.id),
            name: row.name,
            phone: row.phone,
            email: row.email,
            address: row.address,
        }
    }
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a new customer and returns its assigned id.
    pub async fn create(&self, customer: &Customer) -> DbResult<EntityId> {
        customer.validate()?;
        debug!(name = %customer.name, "Inserting customer");

        let result = sqlx::query(
            r#"
            INSERT INTO customers (name, phone, email, address)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(id, name = %customer.name, "Customer created");
        Ok(id)
    }

    /// Gets a customer by ID; `None` if there is none.
    pub async fn get(&self, id: EntityId) -> DbResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, phone, email, address FROM customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    /// Lists all customers by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, phone, email, address FROM customers ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    /// Full replace by id. `Ok(false)` when no customer has that id.
    pub async fn update(&self, customer: &Customer) -> DbResult<bool> {
        let Some(id) = customer.id else {
            return Ok(false);
        };
        customer.validate()?;
        debug!(id, "Updating customer");

        let result = sqlx::query(
            r#"
            UPDATE customers SET
                name = ?2,
                phone = ?3,
                email = ?4,
                address = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a customer.
    ///
    /// Refused with `DbError::StillReferenced` while any order names them.
    pub async fn delete(&self, id: EntityId) -> DbResult<bool> {
        let mut tx = begin(&self.pool).await?;

        let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE customer_id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if orders > 0 {
            return Err(DbError::StillReferenced {
                entity: "Customer".to_string(),
                id,
                dependents: orders,
                dependent_kind: "order(s)".to_string(),
            });
        }

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        commit(tx).await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(id, "Customer deleted");
        }
        Ok(deleted)
    }

    /// Number of stored customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

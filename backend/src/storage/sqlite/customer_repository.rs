use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use crate::domain::models::customer::{Customer, NewCustomer};
use crate::storage::traits::CustomerStorage;
use crate::storage::{StorageError, StorageResult};

/// Repository for customer rows in SQLite
#[derive(Clone, Default)]
pub struct SqliteCustomerRepository;

impl SqliteCustomerRepository {
    pub fn new() -> Self {
        Self
    }
}

fn customer_from_row(row: &SqliteRow) -> Result<Customer, sqlx::Error> {
    Ok(Customer {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl CustomerStorage for SqliteCustomerRepository {
    async fn find_all(&self, conn: &mut SqliteConnection) -> StorageResult<Vec<Customer>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, phone, created_at, updated_at
            FROM customers
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        let customers = rows
            .iter()
            .map(customer_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(customers)
    }

    async fn save(&self, conn: &mut SqliteConnection, customer: NewCustomer) -> StorageResult<Customer> {
        let row = sqlx::query(
            r#"
            INSERT INTO customers (name, email, phone)
            VALUES (?, ?, ?)
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .fetch_one(&mut *conn)
        .await?;

        Ok(Customer {
            id: row.try_get("id")?,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    async fn find_by_id(&self, conn: &mut SqliteConnection, customer_id: i64) -> StorageResult<Customer> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, phone, created_at, updated_at
            FROM customers
            WHERE id = ?
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some(r) => Ok(customer_from_row(&r)?),
            None => Err(StorageError::NotFound),
        }
    }

    async fn update(&self, conn: &mut SqliteConnection, customer: &Customer) -> StorageResult<Customer> {
        sqlx::query(
            r#"
            UPDATE customers
            SET name = ?, email = ?, phone = ?,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            WHERE id = ?
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(customer.id)
        .execute(&mut *conn)
        .await?;

        self.find_by_id(conn, customer.id).await
    }

    async fn delete(&self, conn: &mut SqliteConnection, customer: &Customer) -> StorageResult<()> {
        sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(customer.id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

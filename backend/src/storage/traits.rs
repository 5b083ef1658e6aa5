//! # Storage Traits
//!
//! The repository boundary between the domain layer and the database. Tests
//! substitute their own implementations here to inject faults.

use async_trait::async_trait;
use sqlx::SqliteConnection;

use super::StorageResult;
use crate::domain::models::customer::{Customer, NewCustomer};

/// Customer persistence, executed on a caller-supplied transaction connection
#[async_trait]
pub trait CustomerStorage: Send + Sync {
    /// All customers in insertion order
    async fn find_all(&self, conn: &mut SqliteConnection) -> StorageResult<Vec<Customer>>;

    /// Insert a customer; the database assigns id and timestamps
    async fn save(&self, conn: &mut SqliteConnection, customer: NewCustomer) -> StorageResult<Customer>;

    /// Fetch a single customer, or [`StorageError::NotFound`](super::StorageError::NotFound)
    async fn find_by_id(&self, conn: &mut SqliteConnection, customer_id: i64) -> StorageResult<Customer>;

    /// Overwrite name, email and phone, refresh `updated_at`, and return the stored row
    async fn update(&self, conn: &mut SqliteConnection, customer: &Customer) -> StorageResult<Customer>;

    /// Remove the customer's row. Deleting a row that is already gone is not an error.
    async fn delete(&self, conn: &mut SqliteConnection, customer: &Customer) -> StorageResult<()>;
}

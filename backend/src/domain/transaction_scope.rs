//! # Transaction Scope
//!
//! Runs one unit of work inside exactly one database transaction: commit
//! when the work returns `Ok`, roll back when it returns `Err`. A panic drops
//! the transaction mid-flight, which makes sqlx roll it back when the
//! connection goes back to the pool. The transaction never outlives `run`.

use futures::future::BoxFuture;
use sqlx::{Sqlite, SqliteConnection, Transaction};
use tracing::{debug, warn};

use super::errors::ServiceError;
use crate::storage::{DbConnection, StorageError};

#[derive(Clone)]
pub struct TransactionScope {
    db: DbConnection,
}

impl TransactionScope {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Execute `work` on a fresh transaction.
    ///
    /// The error returned by `work` is handed back untouched; a failure to
    /// roll back is only logged.
    pub async fn run<T, F>(&self, work: F) -> Result<T, ServiceError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T, ServiceError>> + Send,
    {
        let tx = self.db.begin().await.map_err(StorageError::from)?;
        debug!("Transaction started");
        complete(tx, work).await
    }

    /// Like [`run`](Self::run), but the transaction holds the write lock
    /// from the start. Concurrent writers wait for each other.
    pub async fn run_write<T, F>(&self, work: F) -> Result<T, ServiceError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T, ServiceError>> + Send,
    {
        let tx = self.db.begin_write().await.map_err(StorageError::from)?;
        debug!("Write transaction started");
        complete(tx, work).await
    }
}

async fn complete<T, F>(mut tx: Transaction<'static, Sqlite>, work: F) -> Result<T, ServiceError>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T, ServiceError>> + Send,
{
    match work(&mut *tx).await {
        Ok(value) => {
            tx.commit().await.map_err(StorageError::from)?;
            debug!("Transaction committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Failed to roll back transaction: {}", rollback_err);
            } else {
                debug!("Transaction rolled back");
            }
            Err(err)
        }
    }
}

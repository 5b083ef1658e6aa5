//! # Storage Module
//!
//! Persistence for customers. The domain layer talks to the
//! [`CustomerStorage`] trait; [`SqliteCustomerRepository`] is the production
//! implementation. Every repository call runs on a connection borrowed from a
//! transaction the caller already opened, so a repository never begins or
//! commits anything on its own.
//!
//! - **connection.rs** - pool setup, schema bootstrap, transaction start
//! - **traits.rs** - the repository contract
//! - **sqlite/** - SQLite implementation of the contract

pub mod connection;
pub mod sqlite;
pub mod traits;

pub use connection::DbConnection;
pub use sqlite::SqliteCustomerRepository;
pub use traits::CustomerStorage;

use thiserror::Error;

/// Failures surfaced by a repository
#[derive(Debug, Error)]
pub enum StorageError {
    /// A point lookup matched no row
    #[error("Customer not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

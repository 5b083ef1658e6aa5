//! # SQLite Storage Module
//!
//! SQLite-backed implementations of the storage traits.

pub mod customer_repository;

pub use customer_repository::SqliteCustomerRepository;

//! # Domain Module
//!
//! Business logic for customers.
//!
//! - **customer_service**: the five customer operations, each inside one transaction
//! - **transaction_scope**: commit-or-rollback wrapper around a unit of work
//! - **validation**: field violations and the `customerId` path rule
//! - **errors**: the `ServiceError` taxonomy shared by every layer above storage
//! - **models**: domain records

pub mod customer_service;
pub mod errors;
pub mod models;
pub mod transaction_scope;
pub mod validation;

pub use customer_service::CustomerService;
pub use errors::ServiceError;
pub use transaction_scope::TransactionScope;
pub use validation::{parse_customer_id, FieldViolation};

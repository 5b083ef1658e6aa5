use thiserror::Error;
use validator::ValidationErrors;

use super::validation::{violations_from, FieldViolation};
use crate::storage::StorageError;

pub const CUSTOMER_NOT_FOUND: &str = "Customer not found";

/// Every way a customer operation can fail
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The referenced customer does not exist
    #[error("{0}")]
    NotFound(String),
    /// One or more input fields broke their rules
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldViolation>),
    /// Anything else: storage, decoding, programming errors
    #[error(transparent)]
    Fault(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn not_found() -> Self {
        Self::NotFound(CUSTOMER_NOT_FOUND.to_string())
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => Self::not_found(),
            StorageError::Database(e) => {
                Self::Fault(anyhow::Error::new(e).context("Database operation failed"))
            }
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(violations_from(&errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_not_found_maps_to_customer_not_found() {
        let err: ServiceError = StorageError::NotFound.into();
        match err {
            ServiceError::NotFound(message) => assert_eq!(message, "Customer not found"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_database_error_is_fault_with_context() {
        let err: ServiceError = StorageError::Database(sqlx::Error::RowNotFound).into();
        match err {
            ServiceError::Fault(e) => {
                assert_eq!(e.to_string(), "Database operation failed");
                assert!(e.root_cause().to_string().contains("no rows"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

//! backend/src/domain/models/customer.rs

use chrono::{DateTime, Utc};
use shared::CustomerResponse;

/// Domain model of a stored customer.
/// `id`, `created_at` and `updated_at` are always assigned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A customer that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Customer {
    /// Replace the mutable contact fields, leaving identity and timestamps alone
    pub fn apply_changes(&mut self, name: String, email: String, phone: String) {
        self.name = name;
        self.email = email;
        self.phone = phone;
    }

    pub fn into_response(self) -> CustomerResponse {
        CustomerResponse {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

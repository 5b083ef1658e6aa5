use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// E.164 phone number: optional leading country digit, 8 to 15 digits total.
pub static E164_PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9]?[0-9]{7,14}$").expect("E.164 pattern is valid"));

/// Payload for POST /api/customers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_required"), length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_required"), length(max = 255), email)]
    pub email: String,
    #[serde(default)]
    #[validate(
        custom(function = "validate_required"),
        length(max = 255),
        regex(path = *E164_PHONE)
    )]
    pub phone: String,
}

/// Payload for PUT /api/customers/:customerId
///
/// The id in the path always overrides the one in the body, so clients may omit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_required_id"))]
    pub id: i64,
    #[serde(default)]
    #[validate(custom(function = "validate_required"), length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_required"), length(max = 255), email)]
    pub email: String,
    #[serde(default)]
    #[validate(
        custom(function = "validate_required"),
        length(max = 255),
        regex(path = *E164_PHONE)
    )]
    pub phone: String,
}

/// Customer as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Uniform `{code, status, data}` wrapper used for every response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebResponse<T> {
    pub code: u16,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> WebResponse<T> {
    pub fn new(code: u16, status: impl Into<String>, data: T) -> Self {
        Self {
            code,
            status: status.into(),
            data: Some(data),
        }
    }

    /// Envelope without a data member
    pub fn empty(code: u16, status: impl Into<String>) -> Self {
        Self {
            code,
            status: status.into(),
            data: None,
        }
    }
}

/// One entry of a 400 response's data array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrorResponse {
    pub field: String,
    pub error: String,
}

/// Rejects strings that are empty after trimming
pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Rejects a missing (zero) id and ids that cannot name a row
pub fn validate_required_id(id: i64) -> Result<(), ValidationError> {
    if id == 0 {
        return Err(ValidationError::new("required"));
    }
    if id < 0 {
        let mut error = ValidationError::new("gt");
        error.add_param(Cow::from("param"), &0);
        return Err(error);
    }
    Ok(())
}

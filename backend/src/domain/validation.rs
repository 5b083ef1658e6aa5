//! # Validation
//!
//! Turns rule failures into field-level violations with user-facing
//! messages. Request DTOs declare their rules with `validator` derives in
//! the `shared` crate; the `customerId` path parameter is checked here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use validator::{ValidationError, ValidationErrors};

use super::errors::ServiceError;

pub const CUSTOMER_ID_FIELD: &str = "customerId";

static NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("numeric pattern is valid"));

/// One rejected input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, rule: &str, param: Option<&str>) -> Self {
        Self {
            field: field.into(),
            message: message_for(rule, param),
        }
    }
}

/// User-facing message for a failed rule
pub fn message_for(rule: &str, param: Option<&str>) -> String {
    match rule {
        "required" => "This field is required".to_string(),
        "numeric" => "This field must be a numeric value".to_string(),
        "gt" => format!("This field must be greater than {}", param.unwrap_or_default()),
        "lt" => format!("This field must be less than {}", param.unwrap_or_default()),
        _ => "Invalid value".to_string(),
    }
}

fn param_of(error: &ValidationError) -> Option<String> {
    error.params.get("param").map(|value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// One violation per failing field, sorted by field name.
/// `required` outranks any other failure on the same field.
pub fn violations_from(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, field_errors)| {
            let chosen = field_errors
                .iter()
                .find(|e| e.code == "required")
                .or_else(|| field_errors.first())?;
            let param = param_of(chosen);
            Some(FieldViolation::new(field.to_string(), &chosen.code, param.as_deref()))
        })
        .collect();

    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}

/// Validate the raw `customerId` path segment and convert it to an id
pub fn parse_customer_id(raw: &str) -> Result<i64, ServiceError> {
    let violation = |rule: &str, param: Option<&str>| {
        ServiceError::Validation(vec![FieldViolation::new(CUSTOMER_ID_FIELD, rule, param)])
    };

    if raw.is_empty() {
        return Err(violation("required", None));
    }
    if !NUMERIC.is_match(raw) {
        return Err(violation("numeric", None));
    }

    let id: i64 = raw.parse().map_err(|_| violation("numeric", None))?;
    if id <= 0 {
        return Err(violation("gt", Some("0")));
    }

    Ok(id)
}

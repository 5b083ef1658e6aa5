//! # Error Translation
//!
//! The single place where failures become HTTP responses. Priority is fixed:
//! not-found, then validation, then everything else as a 500.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{FieldErrorResponse, WebResponse};
use std::any::Any;
use tracing::{error, warn};

use crate::domain::ServiceError;

pub const UNEXPECTED_ERROR: &str = "Unexpected error occurred";

/// Wrap `data` in the response envelope with the given status
pub fn envelope<T: Serialize>(status: StatusCode, label: &str, data: T) -> Response {
    let body = WebResponse::new(status.as_u16(), label, data);
    (status, Json(body)).into_response()
}

fn internal_server_error(message: String) -> Response {
    envelope(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR", message)
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            ServiceError::NotFound(message) => {
                warn!("Responding 404: {}", message);
                envelope(StatusCode::NOT_FOUND, "NOT FOUND", message)
            }
            ServiceError::Validation(violations) => {
                warn!("Responding 400: {} invalid field(s)", violations.len());
                let data: Vec<FieldErrorResponse> = violations
                    .into_iter()
                    .map(|v| FieldErrorResponse {
                        field: v.field,
                        error: v.message,
                    })
                    .collect();
                envelope(StatusCode::BAD_REQUEST, "BAD REQUEST", data)
            }
            ServiceError::Fault(err) => {
                error!("Responding 500: {:#}", err);
                let message = err.to_string();
                if message.trim().is_empty() {
                    internal_server_error(UNEXPECTED_ERROR.to_string())
                } else {
                    internal_server_error(message)
                }
            }
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::Fault(anyhow::anyhow!(rejection.body_text()))
    }
}

/// Response for a panic caught by `CatchPanicLayer`. The payload is logged, never returned.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else {
        "non-string panic payload"
    };

    error!("Handler panicked: {}", detail);
    internal_server_error(UNEXPECTED_ERROR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldViolation;
    use serde_json::{json, Value};

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        serde_json::from_slice(&bytes).expect("Body should be JSON")
    }

    #[tokio::test]
    async fn test_not_found_translation() {
        let response = ServiceError::not_found().into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"code": 404, "status": "NOT FOUND", "data": "Customer not found"})
        );
    }

    #[tokio::test]
    async fn test_validation_translation() {
        let response = ServiceError::Validation(vec![
            FieldViolation::new("email", "required", None),
            FieldViolation::new("phone", "e164", None),
        ])
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({
                "code": 400,
                "status": "BAD REQUEST",
                "data": [
                    {"field": "email", "error": "This field is required"},
                    {"field": "phone", "error": "Invalid value"}
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_fault_translation_hides_cause() {
        let err = anyhow::anyhow!("disk I/O error").context("Database operation failed");
        let response = ServiceError::Fault(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"code": 500, "status": "INTERNAL SERVER ERROR", "data": "Database operation failed"})
        );
    }

    #[tokio::test]
    async fn test_fault_without_message_uses_generic_text() {
        let response = ServiceError::Fault(anyhow::anyhow!("")).into_response();

        let body = body_json(response).await;
        assert_eq!(body["data"], "Unexpected error occurred");
    }

    #[tokio::test]
    async fn test_panic_payload_is_not_exposed() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"code": 500, "status": "INTERNAL SERVER ERROR", "data": "Unexpected error occurred"})
        );

        let response = handle_panic(Box::new(String::from("secret detail")));
        assert_eq!(body_json(response).await["data"], "Unexpected error occurred");

        let response = handle_panic(Box::new(42_u8));
        assert_eq!(body_json(response).await["data"], "Unexpected error occurred");
    }
}

//! # REST API Interface Layer
//!
//! HTTP endpoints under `/api/customers`. Handlers decode input, call the
//! domain service and wrap results in the `{code, status, data}` envelope.
//! Every failure leaves a handler as a [`ServiceError`](crate::domain::ServiceError)
//! and is rendered by `error_handler`.

pub mod customer_apis;
pub mod error_handler;

pub use customer_apis::*;
pub use error_handler::handle_panic;

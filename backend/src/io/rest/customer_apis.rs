//! # REST API for Customer Management
//!
//! Endpoints for creating, retrieving, updating, and deleting customers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::{CreateCustomerRequest, UpdateCustomerRequest};
use tracing::info;

use super::error_handler::envelope;
use crate::domain::{parse_customer_id, ServiceError};
use crate::AppState;

/// List all customers
pub async fn find_all_customers(State(state): State<AppState>) -> Result<Response, ServiceError> {
    info!("GET /api/customers");

    let customers = state.customer_service.find_all().await?;
    Ok(envelope(StatusCode::OK, "OK", customers))
}

/// Create a new customer
pub async fn create_customer(
    State(state): State<AppState>,
    body: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let Json(request) = body?;
    info!("POST /api/customers - name: {}", request.name);

    let customer = state.customer_service.create(request).await?;
    Ok(envelope(StatusCode::CREATED, "OK", customer))
}

/// Get a customer by ID
pub async fn find_customer_by_id(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Response, ServiceError> {
    info!("GET /api/customers/{}", customer_id);

    let id = parse_customer_id(&customer_id)?;
    let customer = state.customer_service.find_by_id(id).await?;
    Ok(envelope(StatusCode::OK, "OK", customer))
}

/// Update a customer; the path id replaces any id in the body
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    body: Result<Json<UpdateCustomerRequest>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let Json(mut request) = body?;
    info!("PUT /api/customers/{}", customer_id);

    request.id = parse_customer_id(&customer_id)?;
    let customer = state.customer_service.update(request).await?;
    Ok(envelope(StatusCode::OK, "OK", customer))
}

/// Delete a customer
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Response, ServiceError> {
    info!("DELETE /api/customers/{}", customer_id);

    let id = parse_customer_id(&customer_id)?;
    state.customer_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

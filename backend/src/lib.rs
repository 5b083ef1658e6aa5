//! # Customer API
//!
//! CRUD service for customers over HTTP.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST handlers, error translation)
//!     ↓
//! Domain Layer (validation, transaction scope, customer service)
//!     ↓
//! Storage Layer (SQLite pool, customer repository)
//! ```
//!
//! Each request runs its business operation in exactly one database
//! transaction. Errors travel back up as `ServiceError` values and are turned
//! into responses once, at the HTTP boundary.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::Method,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{CustomerService, TransactionScope};
use crate::storage::{DbConnection, SqliteCustomerRepository};

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub customer_service: CustomerService,
}

impl AppState {
    /// Wire the SQLite repository and transaction scope around `db`
    pub fn new(db: DbConnection) -> Self {
        let repository = Arc::new(SqliteCustomerRepository::new());
        let customer_service = CustomerService::new(repository, TransactionScope::new(db));
        Self { customer_service }
    }
}

/// Open the database and build the application state
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(&config.database_url, &config.pool).await?;

    info!("Setting up application state");
    Ok(AppState::new(db))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // Any origin may call the API; preflight requests are answered by the layer itself
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/customers",
            get(io::find_all_customers).post(io::create_customer),
        )
        .route(
            "/customers/:customerId",
            get(io::find_customer_by_id)
                .put(io::update_customer)
                .delete(io::delete_customer),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(CatchPanicLayer::custom(io::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

//! HTTP API Layer
//!
//! This crate provides the REST API for the customer registry using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Customer CRUD and health endpoints
//! - **Middleware**: Request ids, tracing, request logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent `{error, message}` responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(service, health_checks, config);
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;
use domain_customer::CustomerService;

use crate::config::ApiConfig;
use crate::handlers::{customer, health};
use crate::middleware::request_logging_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CustomerService>,
    /// Adapters consulted by `/health/ready`
    pub health_checks: Arc<Vec<Arc<dyn HealthCheckable>>>,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(
        service: CustomerService,
        health_checks: Vec<Arc<dyn HealthCheckable>>,
        config: ApiConfig,
    ) -> Self {
        Self {
            service: Arc::new(service),
            health_checks: Arc::new(health_checks),
            config,
        }
    }
}

/// Creates the main API router
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let customer_routes = Router::new()
        .route("/", get(customer::list_customers).post(customer::create_customer))
        .route(
            "/:id",
            get(customer::get_customer)
                .put(customer::update_customer)
                .delete(customer::delete_customer),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/customers", customer_routes)
        // each layer wraps the ones above it: the request id is set before
        // CORS, tracing and request logging see the request
        .layer(axum_middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

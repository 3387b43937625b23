//! Customer handlers

use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use core_kernel::CustomerId;

use crate::dto::customer::{CustomerRequest, CustomerResponse};
use crate::{error::ApiError, AppState};

fn not_found(id: CustomerId) -> ApiError {
    ApiError::NotFound(format!("Customer {id} not found"))
}

/// Lists all customers
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let customers = state.service.list_customers().await?;
    Ok(Json(customers.into_iter().map(CustomerResponse::from).collect()))
}

/// Gets a customer by ID
#[instrument(skip(state))]
pub async fn get_customer(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let id = CustomerId::new(id?.0);
    let customer = state.service.get_customer(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(customer.into()))
}

/// Creates a customer, resolving its address from the postal code
#[instrument(skip(state, payload))]
pub async fn create_customer(
    State(state): State<AppState>,
    payload: Result<Json<CustomerRequest>, JsonRejection>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let Json(request) = payload?;
    let customer = state.service.insert(request.into_input()?).await?;
    Ok(Json(customer.into()))
}

/// Replaces a customer; the path id wins over any id in the body
#[instrument(skip(state, payload))]
pub async fn update_customer(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CustomerRequest>, JsonRejection>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let id = CustomerId::new(id?.0);
    let Json(request) = payload?;
    let customer = state
        .service
        .update(id, request.into_input()?)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(customer.into()))
}

/// Deletes a customer
#[instrument(skip(state))]
pub async fn delete_customer(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = CustomerId::new(id?.0);
    if state.service.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

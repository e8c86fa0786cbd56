//! # Customers API Handlers
//!
//! CRUD and status endpoints under `/api/customers`.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::Json,
};
use serde_json::json;

use crate::error::{ApiError, not_found, validation_error};
use crate::models::{
    CustomerPatch, CustomerResponse, CustomerUpdate, NewCustomer, StatusUpdate,
    VerificationStatus,
};
use crate::repositories::CustomerRepository;
use crate::server::AppState;
use crate::validation::Validate;

/// Base path of the customers resource
pub const CUSTOMERS_PATH: &str = "/api/customers";

fn check<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload
        .validate()
        .map_err(|errors| validation_error("Customer fields are invalid", errors.to_json()))
}

/// List every customer
#[utoipa::path(
    get,
    path = "/api/customers",
    responses(
        (status = 200, description = "All customers, ordered by id", body = [CustomerResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let repo = CustomerRepository::new(&state.db);
    let customers = repo.find_all().await?;

    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

/// Get a customer by ID
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(
        ("id" = i32, Path, description = "Customer id")
    ),
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let repo = CustomerRepository::new(&state.db);
    let customer = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found("Customer", id))?;

    Ok(Json(customer.into()))
}

/// Create a new customer
#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = NewCustomer,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse, headers(
            ("Location", description = "URL of the created customer"),
            ("X-Trace-Id", description = "Trace identifier for request correlation")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 500, description = "Internal server error")
    ),
    tag = "customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    payload: Result<Json<NewCustomer>, JsonRejection>,
) -> Result<
    (
        StatusCode,
        [(header::HeaderName, String); 1],
        Json<CustomerResponse>,
    ),
    ApiError,
> {
    let Json(request) = payload?;
    check(&request)?;

    let repo = CustomerRepository::new(&state.db);
    let customer = repo.create(request).await?;

    let location = format!("{}/{}", CUSTOMERS_PATH, customer.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(customer.into()),
    ))
}

/// Replace a customer's name, address, phone number and email
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    params(
        ("id" = i32, Path, description = "Customer id")
    ),
    request_body = CustomerUpdate,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<CustomerUpdate>, JsonRejection>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let Json(request) = payload?;
    check(&request)?;

    let repo = CustomerRepository::new(&state.db);
    let customer = repo
        .update(id, request)
        .await?
        .ok_or_else(|| not_found("Customer", id))?;

    Ok(Json(customer.into()))
}

/// Update only the fields present in the body
#[utoipa::path(
    patch,
    path = "/api/customers/{id}",
    params(
        ("id" = i32, Path, description = "Customer id")
    ),
    request_body = CustomerPatch,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "customers"
)]
pub async fn patch_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<CustomerPatch>, JsonRejection>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let Json(request) = payload?;
    check(&request)?;

    let repo = CustomerRepository::new(&state.db);
    let customer = repo
        .patch(id, request)
        .await?
        .ok_or_else(|| not_found("Customer", id))?;

    Ok(Json(customer.into()))
}

/// Change a customer's verification status
#[utoipa::path(
    patch,
    path = "/api/customers/{id}/status",
    params(
        ("id" = i32, Path, description = "Customer id")
    ),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Status changed", body = CustomerResponse),
        (status = 400, description = "Unknown status value", body = ApiError),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "customers"
)]
pub async fn update_customer_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let Json(request) = payload?;

    let status: VerificationStatus = request.status.parse().map_err(|_| {
        validation_error(
            &format!("Unknown verification status '{}'", request.status),
            json!({
                "status": format!("Must be one of: {}", VerificationStatus::allowed_labels())
            }),
        )
    })?;

    let repo = CustomerRepository::new(&state.db);
    let customer = repo
        .update_status(id, status)
        .await?
        .ok_or_else(|| not_found("Customer", id))?;

    Ok(Json(customer.into()))
}

/// Delete a customer
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    params(
        ("id" = i32, Path, description = "Customer id")
    ),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let repo = CustomerRepository::new(&state.db);

    if repo.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Customer", id))
    }
}

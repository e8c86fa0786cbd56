//! # Tests for Handlers
//!
//! This module contains unit tests for API handlers.

use crate::config::AppConfig;
use crate::db::{init_pool, run_migrations};
use crate::handlers::customers::{
    create_customer, delete_customer, get_customer, list_customers, update_customer_status,
};
use crate::handlers::{healthz, readyz, root};
use crate::models::{NewCustomer, ServiceInfo, StatusUpdate, VerificationStatus};
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
};
use serde_json::Value;

async fn test_state() -> AppState {
    let config = AppConfig {
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        ..Default::default()
    };
    let db = init_pool(&config).await.expect("Failed to init test DB");
    run_migrations(&db).await.expect("Failed to migrate test DB");
    AppState::new(config, db)
}

fn ann() -> NewCustomer {
    NewCustomer {
        name: "Ann Lee".to_string(),
        address: "1 Main St".to_string(),
        phone_no: "555-1234".to_string(),
        email: "ann@example.com".to_string(),
        verification_status: None,
    }
}

#[tokio::test]
async fn test_root_handler_returns_expected_service_info() {
    let Json(service_info) = root().await;

    assert_eq!(service_info.service, "customer-registry");
    assert_eq!(service_info.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_root_handler_returns_valid_json() {
    let Json(service_info) = root().await;

    let json_value: Value =
        serde_json::to_value(&service_info).expect("Failed to serialize ServiceInfo");

    assert_eq!(json_value["service"], "customer-registry");
    assert!(json_value.get("version").is_some());
}

#[tokio::test]
async fn test_service_info_default() {
    let service_info = ServiceInfo::default();

    assert_eq!(service_info.service, "customer-registry");
}

#[tokio::test]
async fn test_probes_report_ok() {
    let Json(health) = healthz().await;
    assert_eq!(health.status, "ok");

    let (status, Json(ready)) = readyz(State(test_state().await)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ready.status, "ok");
}

#[tokio::test]
async fn test_create_returns_created_with_location() {
    let state = test_state().await;

    let (status, headers, Json(customer)) =
        create_customer(State(state.clone()), Ok(Json(ann())))
            .await
            .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers[0].0, header::LOCATION);
    assert_eq!(headers[0].1, format!("/api/customers/{}", customer.id));
    assert_eq!(customer.verification_status, VerificationStatus::NotVerified);

    let Json(all) = list_customers(State(state)).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_create_rejects_invalid_fields() {
    let state = test_state().await;
    let request = NewCustomer {
        name: "A".to_string(),
        ..ann()
    };

    let error = create_customer(State(state), Ok(Json(request)))
        .await
        .unwrap_err();

    assert_eq!(error.status, StatusCode::BAD_REQUEST);
    let details = error.details.as_deref().unwrap();
    assert_eq!(details["name"], "Name must be at least 2 characters");
}

#[tokio::test]
async fn test_get_missing_customer_is_not_found() {
    let state = test_state().await;

    let error = get_customer(State(state), Path(12345)).await.unwrap_err();

    assert_eq!(error.status, StatusCode::NOT_FOUND);
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_update_rejects_unknown_value() {
    let state = test_state().await;
    let (_, _, Json(customer)) = create_customer(State(state.clone()), Ok(Json(ann())))
        .await
        .unwrap();

    let error = update_customer_status(
        State(state.clone()),
        Path(customer.id),
        Ok(Json(StatusUpdate {
            status: "Trusted".to_string(),
        })),
    )
    .await
    .unwrap_err();
    assert_eq!(error.status, StatusCode::BAD_REQUEST);

    let Json(updated) = update_customer_status(
        State(state),
        Path(customer.id),
        Ok(Json(StatusUpdate {
            status: "Black Listed".to_string(),
        })),
    )
    .await
    .unwrap();
    assert_eq!(updated.verification_status, VerificationStatus::BlackListed);
}

#[tokio::test]
async fn test_delete_twice_is_not_found() {
    let state = test_state().await;
    let (_, _, Json(customer)) = create_customer(State(state.clone()), Ok(Json(ann())))
        .await
        .unwrap();

    let status = delete_customer(State(state.clone()), Path(customer.id))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let error = delete_customer(State(state), Path(customer.id))
        .await
        .unwrap_err();
    assert_eq!(error.status, StatusCode::NOT_FOUND);
}

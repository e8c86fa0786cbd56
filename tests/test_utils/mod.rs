//! Test utilities for database testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations applied, and a running API server for client tests.

use anyhow::Result;
use customer_registry::config::AppConfig;
use customer_registry::models::{NewCustomer, customer};
use customer_registry::repositories::CustomerRepository;
use customer_registry::server::{AppState, create_app};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// The pool is capped at one connection so every query sees the same in-memory database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Test configuration pointing at an in-memory database.
#[allow(dead_code)]
pub fn test_config() -> AppConfig {
    AppConfig {
        profile: "test".to_string(),
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        ..Default::default()
    }
}

/// Router wired to a fresh in-memory database.
#[allow(dead_code)]
pub async fn setup_test_app() -> Result<(axum::Router, DatabaseConnection)> {
    let db = setup_test_db().await?;
    let app = create_app(AppState::new(test_config(), db.clone()));
    Ok((app, db))
}

/// Serves the API on an unused local port and returns its base URL.
#[allow(dead_code)]
pub async fn spawn_test_server() -> Result<String> {
    let (app, _db) = setup_test_app().await?;
    let port = portpicker::pick_unused_port().ok_or_else(|| anyhow::anyhow!("no free port"))?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(format!("http://127.0.0.1:{}", port))
}

/// A valid create payload.
#[allow(dead_code)]
pub fn new_customer(name: &str, email: &str) -> NewCustomer {
    NewCustomer {
        name: name.to_string(),
        address: "1 Main St".to_string(),
        phone_no: "555-1234".to_string(),
        email: email.to_string(),
        verification_status: None,
    }
}

/// Inserts a customer directly through the repository.
#[allow(dead_code)]
pub async fn create_test_customer(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
) -> Result<customer::Model> {
    let repo = CustomerRepository::new(db);
    Ok(repo.create(new_customer(name, email)).await?)
}

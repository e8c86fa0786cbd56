//! # Customer Registry Library
//!
//! This library provides the core functionality for the Customer Registry: the REST API
//! over the `customers` table, and the operator-side client and screen logic that drive it.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod server;
pub mod telemetry;
pub mod ui;
pub mod validation;

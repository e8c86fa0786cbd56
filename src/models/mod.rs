//! # Data Models
//!
//! This module contains all the data models used throughout the Customer Registry.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod customer;

pub use customer::Entity as Customer;
pub use customer::{
    CustomerPatch, CustomerResponse, CustomerUpdate, NewCustomer, StatusUpdate,
    VerificationStatus,
};

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "customer-registry".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Health probe response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    /// `ok` when healthy, `unavailable` otherwise
    #[schema(example = "ok")]
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            status: "unavailable".to_string(),
        }
    }
}

//! # Customer API Client
//!
//! Typed HTTP client for `/api/customers`, used by the operator screen and the `customers`
//! command line tool. [`CustomerApi`] is the seam the screen is written against, so it can be
//! driven by a fake in tests.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use url::Url;

use crate::handlers::customers::CUSTOMERS_PATH;
use crate::models::{
    CustomerPatch, CustomerResponse, CustomerUpdate, NewCustomer, StatusUpdate,
    VerificationStatus,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Failures surfaced by [`CustomerApi`] calls.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("customer not found")]
    NotFound,
    #[error("{message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

/// Operations the operator screen performs against the customers resource.
#[async_trait]
pub trait CustomerApi: Send + Sync {
    async fn list(&self) -> Result<Vec<CustomerResponse>, ClientError>;

    async fn get(&self, id: i32) -> Result<CustomerResponse, ClientError>;

    async fn create(&self, customer: &NewCustomer) -> Result<CustomerResponse, ClientError>;

    async fn update(
        &self,
        id: i32,
        customer: &CustomerUpdate,
    ) -> Result<CustomerResponse, ClientError>;

    async fn patch(
        &self,
        id: i32,
        patch: &CustomerPatch,
    ) -> Result<CustomerResponse, ClientError>;

    async fn update_status(
        &self,
        id: i32,
        status: VerificationStatus,
    ) -> Result<CustomerResponse, ClientError>;

    async fn delete(&self, id: i32) -> Result<(), ClientError>;
}

/// Body of a `400` response.
#[derive(Debug, Default, Deserialize)]
struct ProblemBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

/// reqwest-backed [`CustomerApi`].
#[derive(Debug, Clone)]
pub struct CustomerClient {
    http: Client,
    base_url: Url,
}

impl CustomerClient {
    /// Create a client for the API served at `base_url` (e.g. `http://localhost:8080`).
    /// A path prefix on the base URL (`http://host/backend`) is kept.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Self::with_http_client(base_url, http)
    }

    pub fn with_http_client(base_url: &str, http: Client) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    /// Resolve a path below the base URL, keeping its prefix.
    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn collection_url(&self) -> Result<Url, ClientError> {
        self.endpoint(CUSTOMERS_PATH)
    }

    fn item_url(&self, id: i32) -> Result<Url, ClientError> {
        self.endpoint(&format!("{}/{}", CUSTOMERS_PATH, id))
    }

    fn status_url(&self, id: i32) -> Result<Url, ClientError> {
        self.endpoint(&format!("{}/{}/status", CUSTOMERS_PATH, id))
    }

    /// Map non-success statuses onto [`ClientError`].
    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        tracing::debug!(status = status.as_u16(), url = %response.url(), "Customer API request failed");

        match status {
            StatusCode::NOT_FOUND => Err(ClientError::NotFound),
            StatusCode::BAD_REQUEST => {
                let body = response.bytes().await?;
                let problem: ProblemBody = serde_json::from_slice(&body).unwrap_or_default();
                let fields = problem
                    .details
                    .and_then(|details| match details {
                        serde_json::Value::Object(map) => Some(map),
                        _ => None,
                    })
                    .map(|map| {
                        map.into_iter()
                            .map(|(field, message)| {
                                let message = match message {
                                    serde_json::Value::String(text) => text,
                                    other => other.to_string(),
                                };
                                (field, message)
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                let message = if problem.message.is_empty() {
                    "Request was rejected".to_string()
                } else {
                    problem.message
                };
                Err(ClientError::Validation { message, fields })
            }
            other => Err(ClientError::Status(other.as_u16())),
        }
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let response = Self::check(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        url: Url,
        body: &B,
    ) -> Result<CustomerResponse, ClientError> {
        let response = self.http.request(method, url).json(body).send().await?;
        Self::read(response).await
    }
}

#[async_trait]
impl CustomerApi for CustomerClient {
    async fn list(&self) -> Result<Vec<CustomerResponse>, ClientError> {
        let response = self.http.get(self.collection_url()?).send().await?;
        Self::read(response).await
    }

    async fn get(&self, id: i32) -> Result<CustomerResponse, ClientError> {
        let response = self.http.get(self.item_url(id)?).send().await?;
        Self::read(response).await
    }

    async fn create(&self, customer: &NewCustomer) -> Result<CustomerResponse, ClientError> {
        self.send_json(reqwest::Method::POST, self.collection_url()?, customer)
            .await
    }

    async fn update(
        &self,
        id: i32,
        customer: &CustomerUpdate,
    ) -> Result<CustomerResponse, ClientError> {
        self.send_json(reqwest::Method::PUT, self.item_url(id)?, customer)
            .await
    }

    async fn patch(
        &self,
        id: i32,
        patch: &CustomerPatch,
    ) -> Result<CustomerResponse, ClientError> {
        self.send_json(reqwest::Method::PATCH, self.item_url(id)?, patch)
            .await
    }

    async fn update_status(
        &self,
        id: i32,
        status: VerificationStatus,
    ) -> Result<CustomerResponse, ClientError> {
        let body = StatusUpdate {
            status: status.label().to_string(),
        };
        self.send_json(reqwest::Method::PATCH, self.status_url(id)?, &body)
            .await
    }

    async fn delete(&self, id: i32) -> Result<(), ClientError> {
        let response = self.http.delete(self.item_url(id)?).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_built_from_base() {
        let client = CustomerClient::new("http://localhost:8080/").unwrap();

        assert_eq!(
            client.collection_url().unwrap().as_str(),
            "http://localhost:8080/api/customers"
        );
        assert_eq!(
            client.item_url(7).unwrap().as_str(),
            "http://localhost:8080/api/customers/7"
        );
        assert_eq!(
            client.status_url(7).unwrap().as_str(),
            "http://localhost:8080/api/customers/7/status"
        );
    }

    #[test]
    fn test_base_url_path_prefix_is_kept() {
        for base in ["http://host/backend", "http://host/backend/"] {
            let client = CustomerClient::new(base).unwrap();

            assert_eq!(
                client.collection_url().unwrap().as_str(),
                "http://host/backend/api/customers"
            );
            assert_eq!(
                client.status_url(3).unwrap().as_str(),
                "http://host/backend/api/customers/3/status"
            );
        }
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            CustomerClient::new("not a url"),
            Err(ClientError::InvalidBaseUrl(_))
        ));
    }
}

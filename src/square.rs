//! Square Payments and Catalog API client

use anyhow::Context;
use async_trait::async_trait;

use crate::config::{SquareConfig, SQUARE_VERSION};
use crate::models::{CatalogObjectType, CreatePaymentRequest};

/// Status and raw body of a Square API call. Handlers decide what the status means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: String,
}

impl RemoteResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The two Square endpoints the storefront talks to.
///
/// An `Err` means the request never produced an HTTP response.
#[async_trait]
pub trait SquareApi: Send + Sync {
    async fn create_payment(&self, payment: &CreatePaymentRequest) -> anyhow::Result<RemoteResponse>;

    async fn list_catalog(
        &self,
        types: &[CatalogObjectType],
        cursor: Option<&str>,
    ) -> anyhow::Result<RemoteResponse>;
}

pub struct SquareClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl SquareClient {
    pub fn new(config: &SquareConfig) -> Self {
        SquareClient {
            http: reqwest::Client::new(),
            base_url: config.base_url().to_string(),
            access_token: config.access_token.clone().unwrap_or_default(),
        }
    }

    fn with_headers(&self, request_builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request_builder
            .bearer_auth(&self.access_token)
            .header("Square-Version", SQUARE_VERSION)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
    }

    async fn send(&self, request_builder: reqwest::RequestBuilder, what: &str) -> anyhow::Result<RemoteResponse> {
        let response = self
            .with_headers(request_builder)
            .send()
            .await
            .with_context(|| format!("Failed to send {} request to Square", what))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read {} response body", what))?;

        Ok(RemoteResponse { status, body })
    }
}

#[async_trait]
impl SquareApi for SquareClient {
    async fn create_payment(&self, payment: &CreatePaymentRequest) -> anyhow::Result<RemoteResponse> {
        let url = format!("{}/v2/payments", self.base_url);
        self.send(self.http.post(&url).json(payment), "payment").await
    }

    async fn list_catalog(
        &self,
        types: &[CatalogObjectType],
        cursor: Option<&str>,
    ) -> anyhow::Result<RemoteResponse> {
        let url = format!("{}/v2/catalog/list", self.base_url);
        let mut query = vec![("types", CatalogObjectType::join(types))];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }
        self.send(self.http.get(&url).query(&query), "catalog").await
    }
}

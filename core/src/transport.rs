use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::errors::{ConfigError, TransportError};
use crate::types::Query;

/// Status and body of an HTTP response, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Delivers one query to the endpoint and hands back whatever came back.
///
/// Implementations make exactly one network call per invocation and never
/// retry on their own.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn send(&self, endpoint: &Url, query: &Query) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport posting JSON
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// `timeout` bounds each attempt; `None` leaves reqwest's default.
    pub fn new(timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ConfigError::HttpClient)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, endpoint: &Url, query: &Query) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .post(endpoint.clone())
            .json(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), size = body.len(), "Received response");

        Ok(RawResponse { status, body })
    }
}

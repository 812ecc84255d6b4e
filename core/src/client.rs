use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientSettings;
use crate::errors::{ConfigError, QueryError, QueryResult};
use crate::retry::{Attempt, RetryPolicy};
use crate::transport::{HttpTransport, RawResponse, Transport};
use crate::types::{Query, QueryResponse};

/// Client for the catalogue query endpoint
///
/// Cloning is cheap and clones share the transport. Concurrent calls to
/// [`QueryClient::execute`] share no mutable state.
#[derive(Debug)]
pub struct QueryClient<X: Transport = HttpTransport> {
    transport: Arc<X>,
    endpoint: Url,
    policy: RetryPolicy,
}

impl<X: Transport> Clone for QueryClient<X> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            endpoint: self.endpoint.clone(),
            policy: self.policy,
        }
    }
}

impl QueryClient<HttpTransport> {
    /// Create a client talking HTTP to the configured endpoint
    pub fn new(settings: &ClientSettings) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(settings.request_timeout)?;
        Ok(Self::with_transport(
            transport,
            settings.endpoint.clone(),
            settings.retry,
        ))
    }
}

impl<X: Transport> QueryClient<X> {
    pub fn with_transport(transport: X, endpoint: Url, policy: RetryPolicy) -> Self {
        Self {
            transport: Arc::new(transport),
            endpoint,
            policy,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Run a query and decode its `data` field as `T`.
    ///
    /// Transport failures and 5xx responses are retried up to the policy's
    /// attempt budget with a fixed delay in between; the last of them is
    /// returned once the budget is spent. Any other non-success status, an
    /// error list in the response, or an undecodable body fails at once.
    pub async fn execute<T: DeserializeOwned>(&self, query: &Query) -> QueryResult<T> {
        let mut attempt = 1;
        loop {
            debug!(attempt, endpoint = %self.endpoint, "Sending query");
            match self.attempt_once(query).await {
                Attempt::Success(data) => return Ok(data),
                Attempt::Terminal(error) => {
                    debug!(attempt, error = %error, "Query failed with a terminal error");
                    return Err(error);
                }
                Attempt::Retryable(error) if self.policy.allows_retry_after(attempt) => {
                    warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts(),
                        error = %error,
                        "Query attempt failed, retrying in {:?}...",
                        self.policy.delay()
                    );
                    tokio::time::sleep(self.policy.delay()).await;
                    attempt += 1;
                }
                Attempt::Retryable(error) => {
                    warn!(attempts = attempt, error = %error, "Query failed after all attempts");
                    return Err(error);
                }
            }
        }
    }

    async fn attempt_once<T: DeserializeOwned>(&self, query: &Query) -> Attempt<T> {
        match self.transport.send(&self.endpoint, query).await {
            Ok(response) => interpret(response),
            Err(error) => Attempt::Retryable(error.into()),
        }
    }
}

/// Classify a raw response into an attempt outcome.
pub fn interpret<T: DeserializeOwned>(response: RawResponse) -> Attempt<T> {
    let status = response.status;
    if status.is_server_error() {
        return Attempt::Retryable(QueryError::Server(status.as_u16()));
    }
    if !status.is_success() {
        return Attempt::Terminal(QueryError::Client(status.as_u16()));
    }

    match decode_body(&response.body) {
        Ok(data) => Attempt::Success(data),
        Err(error) => Attempt::from_error(error),
    }
}

fn decode_body<T: DeserializeOwned>(body: &str) -> QueryResult<T> {
    let envelope: QueryResponse =
        serde_json::from_str(body).map_err(|e| QueryError::Decode(e.to_string()))?;

    if let Some(messages) = envelope.error_messages() {
        return Err(QueryError::Application(messages));
    }

    let data = envelope
        .data
        .ok_or_else(|| QueryError::Decode("response carried no data".to_string()))?;
    serde_json::from_value(data).map_err(|e| QueryError::Decode(e.to_string()))
}

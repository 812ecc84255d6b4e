// This crate contains the remote-query layer of the meeting catalogue client:
// - Query client with bounded retry
// - Transport seam (reqwest-backed in production)
// - Request/response wire structures
// - Configuration loading
// - Shared error types

// Export client module - retrying query client
pub mod client;
pub use client::*;

// Export retry module - retry policy and attempt outcomes
pub mod retry;
pub use retry::RetryPolicy;

// Export transport module - how a query reaches the endpoint
pub mod transport;
pub use transport::{HttpTransport, RawResponse, Transport};
pub use reqwest::{StatusCode, Url};

// Export types module - wire structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

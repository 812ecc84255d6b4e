use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single network attempt before any HTTP status was seen.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// For transports not built on reqwest, which have no `reqwest::Error` to report.
    #[error("Connection failed: {0}")]
    Connection(String),
}

/// Errors surfaced by [`crate::QueryClient::execute`]
#[derive(Error, Debug)]
pub enum QueryError {
    /// Network or connection failure. Transient.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// 5xx-class response. Transient.
    #[error("HTTP error! status: {0}")]
    Server(u16),

    /// Any other non-success status. Terminal.
    #[error("HTTP error! status: {0}")]
    Client(u16),

    /// The endpoint answered but reported errors of its own. Terminal.
    #[error("{}", .0.join(", "))]
    Application(Vec<String>),

    /// A successful status with a body that does not match the expected shape. Terminal.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl QueryError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, QueryError::Transport(_) | QueryError::Server(_))
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            QueryError::Server(status) | QueryError::Client(status) => Some(*status),
            _ => None,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("API endpoint is not configured (set KOKKAI_API_URL or api_url in the config file)")]
    MissingEndpoint,

    #[error("Invalid API endpoint {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_joins_messages() {
        let err = QueryError::Application(vec!["A".to_string(), "B".to_string()]);
        assert_eq!(err.to_string(), "A, B");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_status_errors_encode_code() {
        assert_eq!(QueryError::Client(404).to_string(), "HTTP error! status: 404");
        assert_eq!(QueryError::Server(503).status(), Some(503));
        assert!(QueryError::Server(503).is_transient());
        assert!(!QueryError::Client(400).is_transient());
    }

    #[test]
    fn test_transport_errors_are_transient() {
        let err = QueryError::from(TransportError::Connection("refused".to_string()));
        assert!(err.is_transient());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "Connection failed: refused");
    }
}

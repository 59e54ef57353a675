//! Error types for ClauseChat core

use thiserror::Error;

/// Failure of the transport underneath an agent call.
///
/// Never retried automatically; the caller decides what to do with it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced a response (DNS, refused connection, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// The agent answered with a non-2xx status
    #[error("API Error: {status} - {status_text}\nDetails: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase for the status
        status_text: String,
        /// Raw response body, as returned by the agent
        body: String,
    },

    /// The response body was not valid JSON
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl TransportError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        TransportError::Network(msg.into())
    }

    /// Create a status error
    pub fn status(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        TransportError::Status {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        TransportError::Decode(msg.into())
    }

    /// Whether the agent was reached and answered with an error status
    pub fn is_http_status(&self) -> bool {
        matches!(self, TransportError::Status { .. })
    }
}

/// Errors from configuration, prompt lookup and transcript export
///
/// Agent calls report [`TransportError`] instead; the controller turns those
/// into transcript messages rather than propagating them.
#[derive(Debug, Error)]
pub enum ClauseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Not found error (generic)
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Convenient Result type using ClauseError
pub type Result<T> = std::result::Result<T, ClauseError>;

impl ClauseError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        ClauseError::Config(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        ClauseError::NotFound(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ClauseError::config("missing endpoint");
        assert_eq!(err.to_string(), "Configuration error: missing endpoint");

        let err = ClauseError::not_found("prompt 'nope'");
        assert_eq!(err.to_string(), "Not found: prompt 'nope'");
    }

    #[test]
    fn test_status_error_display_embeds_body() {
        let err = TransportError::status(503, "Service Unavailable", "upstream down");
        assert_eq!(
            err.to_string(),
            "API Error: 503 - Service Unavailable\nDetails: upstream down"
        );
        assert!(err.is_http_status());
        assert!(!TransportError::network("refused").is_http_status());
    }

    #[test]
    fn test_io_error_converts() {
        fn fails() -> Result<()> {
            std::fs::read("/nonexistent/clause-chat/transcript.txt")?;
            Ok(())
        }

        match fails() {
            Err(ClauseError::Io(err)) => assert_eq!(err.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected: {:?}", other),
        }
    }
}

//! Error types for the FaaS protocol client
//!
//! Every failed HTTP exchange, whatever the transport reported, maps into the
//! single [`Error::Protocol`] variant so retry logic never has to
//! special-case the layer that raised it.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the protocol client
#[derive(Error, Debug)]
pub enum Error {
    /// Non-2xx HTTP response or a connection-level failure
    #[error("{message}")]
    Protocol {
        /// HTTP status, when the exchange completed
        status: Option<StatusCode>,
        message: String,
        /// Raw response body text, when available
        body: Option<String>,
        /// Set when the transport reported a connection-level failure
        connect: bool,
    },

    /// Logical lookup miss; never retried by the resource client itself
    #[error("no deployment named \"{suffix}\"")]
    NotFound { suffix: String },

    /// Retry budget consumed; carries the last underlying error's message
    #[error("{operation} failed after {attempts} retries: {last_error}")]
    RetryExhausted {
        operation: String,
        attempts: u32,
        last_error: String,
    },

    /// Connection failure on the very first readiness probe
    #[error("cannot reach the FaaS at {url}; start it first, then retry")]
    Unreachable { url: String },

    /// Invalid base URL or join failure
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Request-side encode failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Config file could not be written or encoded
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Protocol error for a completed exchange with a non-2xx status
    pub(crate) fn http_status(status: StatusCode, body: String) -> Self {
        Error::Protocol {
            status: Some(status),
            message: format!("API request failed: {status}"),
            body: (!body.is_empty()).then_some(body),
            connect: false,
        }
    }

    /// Protocol error for a 2xx body that does not decode into the expected type
    pub(crate) fn decode(status: StatusCode, body: String, err: &serde_json::Error) -> Self {
        Error::Protocol {
            status: Some(status),
            message: format!("failed to decode response body: {err}"),
            body: Some(body),
            connect: false,
        }
    }

    /// True when the underlying failure was connection-level
    /// (refused, unreachable, DNS)
    pub fn is_connect(&self) -> bool {
        matches!(self, Error::Protocol { connect: true, .. })
    }

    /// HTTP status of a failed exchange, when one completed
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Protocol { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Protocol {
            status: err.status(),
            message: err.to_string(),
            body: None,
            connect: err.is_connect(),
        }
    }
}

use std::time::Duration;
use thiserror::Error;

/// A probe could not complete. Always local to one candidate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("name resolution failed: {0}")]
    Resolve(String),

    #[error("http request failed: {0}")]
    Http(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl TransportError {
    /// Classify a reqwest failure; `timeout` is the budget the request ran under.
    pub fn from_reqwest(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(timeout)
        } else if e.is_decode() {
            TransportError::Malformed(e.to_string())
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Http(e.to_string())
        }
    }
}

/// Rejected user input, raised before any probe is issued.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("target is empty")]
    EmptyTarget,

    #[error("invalid target {target:?}: {reason}")]
    Invalid { target: String, reason: String },
}

/// Failure of a one-shot lookup (WHOIS, geolocation, fingerprint).
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Well-formed answer that reports absence or failure.
    #[error("{service} reported failure: {message}")]
    Negative { service: &'static str, message: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

//! Error types for pagestream
//!
//! Two error types live here:
//! - [`Error`] for setup-time failures (config, URLs, client construction)
//! - [`StreamError`] for failures that terminate a stream
//!
//! A [`StreamError`] is always the last event a failing stream delivers.

use crate::request::RequestDescriptor;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The main error type for setup and configuration
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Undefined environment variable: {variable}")]
    UndefinedVariable { variable: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }
}

/// Result type alias for pagestream
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

// ============================================================================
// Stream Errors
// ============================================================================

/// Category of a stream-terminating failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request descriptor could not be turned into a request
    MalformedRequest,
    /// Network failure, timeout, or 5xx response
    Transient,
    /// 401 or 403
    Authorization,
    /// 404
    NotFound,
    /// 429, or a 403 with an exhausted rate-limit header
    RateLimited,
    /// The body could not be decoded
    MalformedResponse,
}

impl ErrorKind {
    /// Map a non-success HTTP status to a failure category.
    ///
    /// `rate_limit_exhausted` is true when the response said the caller has
    /// no requests left in the current window.
    pub fn from_status(status: u16, rate_limit_exhausted: bool) -> Self {
        match status {
            429 => Self::RateLimited,
            403 if rate_limit_exhausted => Self::RateLimited,
            401 | 403 => Self::Authorization,
            404 => Self::NotFound,
            500..=599 => Self::Transient,
            _ => Self::MalformedRequest,
        }
    }

    /// Whether a caller could reasonably retry the same request later
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Transient | Self::RateLimited)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MalformedRequest => "malformed request",
            Self::Transient => "transient failure",
            Self::Authorization => "authorization failure",
            Self::NotFound => "not found",
            Self::RateLimited => "rate limit exceeded",
            Self::MalformedResponse => "malformed response",
        };
        f.write_str(name)
    }
}

/// A failure that terminates a stream
#[derive(Error, Debug, Clone)]
#[error("{kind}{}: {message}", status_suffix(.status))]
pub struct StreamError {
    /// Failure category
    pub kind: ErrorKind,
    /// HTTP status, when the failure came from a response
    pub status: Option<u16>,
    /// Human-readable detail
    pub message: String,
    /// The request that triggered the failure
    pub descriptor: Option<RequestDescriptor>,
    /// Server-provided wait hint for rate-limit failures
    pub retry_after: Option<Duration>,
}

impl StreamError {
    /// Create a stream error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            descriptor: None,
            retry_after: None,
        }
    }

    pub fn malformed_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedRequest, message)
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, message)
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transient, message)
    }

    /// Create an error from a non-success HTTP status
    pub fn from_status(status: u16, rate_limit_exhausted: bool, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::new(ErrorKind::from_status(status, rate_limit_exhausted), body)
        }
    }

    /// Attach the request that triggered this failure
    #[must_use]
    pub fn with_descriptor(mut self, descriptor: RequestDescriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    /// Attach a retry-after hint
    #[must_use]
    pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
        self.retry_after = retry_after;
        self
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl From<Error> for StreamError {
    fn from(err: Error) -> Self {
        match err {
            Error::Decode { .. } | Error::JsonParse(_) => Self::malformed_response(err.to_string()),
            Error::Http(ref e) if e.is_timeout() || e.is_connect() || e.is_request() => {
                Self::transient(err.to_string())
            }
            _ => Self::malformed_request(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for StreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            return Self::malformed_request(err.to_string());
        }
        let mut mapped = Self::transient(err.to_string());
        mapped.status = err.status().map(|s| s.as_u16());
        mapped
    }
}

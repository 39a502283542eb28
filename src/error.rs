//! Error types for folio

use std::time::Duration;
use thiserror::Error;

/// Result type alias for folio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to load content. View it on GitHub: {web_url}")]
    ContentUnavailable { web_url: String },

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Why a remote call failed, independent of the message text.
///
/// Retry logic and tests branch on this instead of inspecting strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Network error, timeout, or a non-success status
    Transient,
    /// The host refused the call because of rate limiting
    RateLimited,
    /// The response arrived but could not be decoded
    Malformed,
}

/// Hosting API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Rate limit exceeded for {context}")]
    RateLimited {
        context: String,
        retry_after: Option<Duration>,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("GitHub API error: {status} {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid response for {context}: {message}")]
    Malformed { context: String, message: String },
}

impl ApiError {
    /// Collapse the error into its failure reason.
    pub fn reason(&self) -> FailureReason {
        match self {
            ApiError::RateLimited { .. } => FailureReason::RateLimited,
            ApiError::Malformed { .. } => FailureReason::Malformed,
            ApiError::NotFound(_)
            | ApiError::Status { .. }
            | ApiError::Network(_)
            | ApiError::Timeout(_) => FailureReason::Transient,
        }
    }

    pub(crate) fn malformed(context: impl Into<String>, message: impl ToString) -> Self {
        ApiError::Malformed {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else if err.is_decode() {
            ApiError::malformed("response body", err)
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `folio init` to set up.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Write-ups repository not configured. Run `folio init` to set it up.")]
    MissingWriteups,

    #[error("Invalid repository identifier '{0}', expected owner/name")]
    InvalidRepository(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Local cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Could not determine cache directory")]
    NoHome,

    #[error("Cache I/O error: {0}")]
    Io(String),

    #[error("Cache database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cache entry could not be encoded: {0}")]
    Serde(#[from] serde_json::Error),
}

//! Error types for audit generation and local persistence.
//!
//! [`AuditError`] is the single error surfaced to callers of the
//! orchestrator. [`StorageError`] never leaves the cache layer: cache
//! operations log it and carry on.

use thiserror::Error;

/// Errors that can occur while generating an audit.
#[derive(Error, Debug)]
pub enum AuditError {
    /// The provider rejected the credential (HTTP 401).
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// The provider is rate limiting this credential (HTTP 429).
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Forbidden or billing problem on the provider account (HTTP 403).
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Any other transport-level failure.
    #[error("Transport error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport {
        /// HTTP status, when a response was received at all.
        status: Option<u16>,
        /// Provider message or client error text.
        message: String,
    },

    /// The model output did not contain a parseable JSON object.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The model returned no recommendations.
    #[error("Audit contained no recommendations")]
    EmptyResult,

    /// The audit request failed validation.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuditError {
    /// A single human-facing message suitable for an error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredential(_) => {
                "Invalid API key. Please check your OpenAI API key and try again.".to_string()
            }
            Self::RateLimited(_) => {
                "API rate limit exceeded. Please try again in a few minutes.".to_string()
            }
            Self::AccessDenied(_) => {
                "API access forbidden. Please check your OpenAI account status and billing."
                    .to_string()
            }
            Self::Transport { message, .. } => format!("API request failed: {}", message),
            Self::Parse(_) => "Failed to parse audit results.".to_string(),
            Self::EmptyResult => {
                "The audit came back without any recommendations. Please try again.".to_string()
            }
            Self::Validation(msg) => msg.clone(),
            Self::Config(msg) => format!("Configuration problem: {}", msg),
        }
    }

    /// Whether resubmitting the same request verbatim might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited(_) | Self::Transport { .. } | Self::Parse(_) | Self::EmptyResult
        )
    }
}

impl From<reqwest::Error> for AuditError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AuditError>;

/// Failures of the persistent key-value layer.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded { needed: usize, limit: usize },
}

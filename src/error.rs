//! citysuggest error types

use std::time::Duration;

use crate::types::ValidationError;

/// citysuggest error types
#[derive(Debug, thiserror::Error)]
pub enum CitySuggestError {
    // Request errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    // Store errors
    #[error("store error: {0}")]
    Store(String),

    // Data errors
    /// The fallback provider answered, but not in the expected list shape.
    #[error("malformed suggestions: {0}")]
    MalformedSuggestions(String),

    // Soft errors
    #[error("empty response from model")]
    EmptyResponse,

    // Configuration errors
    #[error("no store configured")]
    NoStore,

    #[error("no suggestion provider configured")]
    NoProvider,

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl CitySuggestError {
    /// Whether the error came from a remote collaborator rather than from
    /// the caller or local configuration.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            CitySuggestError::Http(_)
                | CitySuggestError::Api { .. }
                | CitySuggestError::RateLimited { .. }
                | CitySuggestError::AuthenticationFailed
                | CitySuggestError::ModelNotFound(_)
                | CitySuggestError::Store(_)
                | CitySuggestError::EmptyResponse
                | CitySuggestError::MalformedSuggestions(_)
        )
    }
}

impl From<reqwest::Error> for CitySuggestError {
    fn from(err: reqwest::Error) -> Self {
        CitySuggestError::Http(err.to_string())
    }
}

/// Result type alias for citysuggest operations
pub type Result<T> = std::result::Result<T, CitySuggestError>;

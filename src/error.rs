//! Error type shared by the backends, the store and the views.

use thiserror::Error;

/// Failure of a store or backend operation.
///
/// Every variant is recoverable: the caller shows [`StoreError::user_message`]
/// and keeps its form state so the user can retry.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A required field was missing or empty.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The referenced template or task does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with an unexpected status.
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// The local data file could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// A record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend was configured with unusable settings.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Text shown to the user in an alert: the backend's message when there
    /// is one, otherwise the error's own description.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Validation(msg) | StoreError::NotFound(msg) => msg.clone(),
            StoreError::Backend { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Backend { status: 0, message: format!("invalid response body: {err}") }
        } else {
            StoreError::Network(err.to_string())
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

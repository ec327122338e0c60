//! Client error types

use shared::StoreError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Object storage answered with a non-success status
    #[error("Storage error {status}: {message}")]
    Storage { status: u16, message: String },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid client configuration or input
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Re-tag a backend rejection as coming from object storage
    pub(crate) fn into_storage(self) -> Self {
        match self {
            ClientError::Api { status, message } => ClientError::Storage { status, message },
            other => other,
        }
    }
}

impl From<ClientError> for StoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) if e.is_decode() => StoreError::Decode(e.to_string()),
            ClientError::Http(e) => StoreError::Transport(e.to_string()),
            ClientError::Api { status, message } | ClientError::Storage { status, message } => {
                StoreError::Rejected { status, message }
            }
            ClientError::NotFound(what) => StoreError::NotFound(what),
            ClientError::InvalidResponse(msg) => StoreError::Decode(msg),
            ClientError::Serialization(e) => StoreError::Decode(e.to_string()),
            ClientError::Invalid(msg) => StoreError::Rejected {
                status: 400,
                message: msg,
            },
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Invalid(msg) => AppError::validation(msg),
            ClientError::Storage { status, message } => {
                AppError::with_message(ErrorCode::StorageError, message)
                    .with_detail("status", status)
            }
            ClientError::Http(e) if e.is_timeout() => {
                AppError::with_message(ErrorCode::TimeoutError, e.to_string())
            }
            other => StoreError::from(other).into(),
        }
    }
}

//! Client error taxonomy.

use reqwest::StatusCode;

use crate::models::error::ApiErrorBody;

/// Errors produced by the request gateway, the endpoint groups and the session store.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend answered with a non-2xx status.
    #[error("{} (HTTP {status}, code {})", error.message, error.code)]
    Api { status: StatusCode, error: ApiErrorBody },

    /// The request never produced a response (connect, TLS, timeout, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A token refresh was attempted with nothing stored.
    #[error("No refresh token")]
    MissingRefreshToken,

    /// The response body parsed as JSON but did not fit the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request body could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encode(serde_json::Error),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("token storage error: {0}")]
    Storage(String),

    /// The configured auth strategy does not offer this capability.
    #[error("'{operation}' is not available with the '{strategy}' auth strategy")]
    Unsupported {
        operation: &'static str,
        strategy: &'static str,
    },

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured payload of an API error, if this is one.
    pub fn api_error(&self) -> Option<&ApiErrorBody> {
        match self {
            ClientError::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

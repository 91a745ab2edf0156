use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Machine-readable error payload returned by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl ApiErrorBody {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        ApiErrorBody {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Used whenever an error response body cannot be understood.
    pub fn unknown() -> Self {
        Self::new("UNKNOWN", "An error occurred")
    }
}

/// The `{ "error": {...} }` wrapper every error response uses.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorEnvelope {
    pub error: ApiErrorBody,
}

impl ErrorEnvelope {
    /// Parse an error response body, falling back to [`ApiErrorBody::unknown`].
    pub fn parse_or_unknown(body: &str) -> ApiErrorBody {
        serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error)
            .unwrap_or_else(|_| ApiErrorBody::unknown())
    }
}

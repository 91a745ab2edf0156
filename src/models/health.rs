use serde::{Deserialize, Serialize};

/// Body of `/health` and `/ready`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    #[serde(default)]
    pub version: String,
}

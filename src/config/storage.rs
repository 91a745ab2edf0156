use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where session tokens are kept. We differentiate backends via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
#[serde(tag = "type")]
pub enum StorageConfig {
    /// Tokens live as long as the process, like a browser tab's session storage.
    #[default]
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "file")]
    File(FileStorageConfig),
}

#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct FileStorageConfig {
    pub path: PathBuf,
}

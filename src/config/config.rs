use std::path::Path;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use reqwest::Url;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::auth::AuthSettings;
use super::logging::LoggingConfig;
use super::storage::StorageConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: where the backend lives, which auth strategy
/// the session uses, where tokens are kept and how we log.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend address and transport settings for the request gateway.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. When unset only the transport's own limits apply.
    #[serde(default)]
    pub timeout_in_ms: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            timeout_in_ms: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl ConfigV1 {
    /// Checks settings that serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.api.base_url)
            .map_err(|e| format!("api.base_url '{}' is not a valid URL: {}", self.api.base_url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "api.base_url must use http or https, got '{}'",
                url.scheme()
            ));
        }
        if self.api.timeout_in_ms == Some(0) {
            return Err("api.timeout_in_ms must be greater than zero".to_string());
        }
        if !self.auth.login_path.starts_with('/') {
            return Err(format!(
                "auth.login_path must be an absolute path, got '{}'",
                self.auth.login_path
            ));
        }
        Ok(())
    }
}

/// Layers the configuration sources: built-in defaults, then the YAML file
/// (if it exists), then `LICH_`-prefixed variables (`LICH_API__BASE_URL`),
/// then `API_URL` as a shortcut for the backend address.
pub fn config_figment(path: impl AsRef<Path>) -> Figment {
    Figment::new()
        .merge(Serialized::default("version", "1.0.0"))
        .merge(Yaml::file(path.as_ref()))
        .merge(Env::prefixed("LICH_").split("__"))
        .merge(Env::raw().only(&["API_URL"]).map(|_| "api.base_url".into()))
}

/// Extract and validate the configuration from a figment.
pub fn extract_config(figment: &Figment) -> Result<ConfigV1, String> {
    let config = figment
        .extract::<Config>()
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let Config::ConfigV1(config) = config;
    config.validate()?;
    Ok(config)
}

/// Load config from the given YAML file plus environment overrides.
pub fn load_config(path: impl AsRef<Path>) -> Result<ConfigV1, String> {
    extract_config(&config_figment(path))
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

#![allow(dead_code)]

use std::sync::Arc;

use figment::{
    providers::{Format, Yaml},
    Figment,
};
use lich_client::config::{extract_config, ConfigV1};
use lich_client::startup::build_context;
use lich_client::state::AppContext;
use serde_json::{json, Value};

pub const USER_ID: &str = "6f1c1f0e-8f5a-4a53-9a55-2b7f5d2b4c11";

const TEST_CONFIG: &str = r#"
version: "1.0.0"
api:
  base_url: "{base_url}/api"
  timeout_in_ms: 5000
auth:
  strategy: "{strategy}"
storage:
  type: memory
logging:
  level: "debug"
  format: "json"
"#;

pub fn load_test_config(base_url: &str, strategy: &str) -> ConfigV1 {
    let yaml = TEST_CONFIG
        .replace("{base_url}", base_url)
        .replace("{strategy}", strategy);
    extract_config(&Figment::new().merge(Yaml::string(&yaml)))
        .expect("Failed to parse test config YAML")
}

pub fn build_app(base_url: &str, strategy: &str) -> AppContext {
    build_app_from(load_test_config(base_url, strategy))
}

pub fn build_app_from(config: ConfigV1) -> AppContext {
    build_context(Arc::new(config)).expect("context should build")
}

pub fn user_json(email: &str) -> Value {
    json!({
        "id": USER_ID,
        "email": email,
        "username": email.split('@').next().unwrap(),
        "first_name": "Ada",
        "last_name": "Lovelace",
        "full_name": "Ada Lovelace",
        "role": "user",
        "status": "active",
        "is_verified": true,
        "avatar_url": null,
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": null
    })
}

pub fn login_json(email: &str, access: &str, refresh: &str) -> String {
    json!({
        "user": user_json(email),
        "tokens": {
            "access_token": access,
            "refresh_token": refresh,
            "token_type": "bearer",
            "expires_in": 900
        }
    })
    .to_string()
}

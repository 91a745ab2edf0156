use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which authentication strategy the generated app was built with.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuthStrategy {
    /// Email/password against the backend's own JWT endpoints.
    #[default]
    JwtBuiltin,
    /// External identity provider; the backend only validates its tokens.
    Keycloak,
    /// No authentication at all.
    None,
}

impl AuthStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthStrategy::JwtBuiltin => "jwt_builtin",
            AuthStrategy::Keycloak => "keycloak",
            AuthStrategy::None => "none",
        }
    }
}

/// Session-related settings.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct AuthSettings {
    #[serde(default)]
    pub strategy: AuthStrategy,
    /// Where the route guard sends anonymous visitors.
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings {
            strategy: AuthStrategy::default(),
            login_path: default_login_path(),
        }
    }
}

fn default_login_path() -> String {
    "/login".to_string()
}

use std::sync::Arc;

use reqwest::Url;
use tokio::sync::OnceCell;
use tracing::debug;

use super::AuthBackend;
use crate::config::AuthStrategy;
use crate::error::Result;
use crate::gateway::ApiClient;
use crate::models::{AuthConfig, UserResponse};

/// Sessions whose tokens come from an external identity provider.
///
/// Credentials never pass through this client: login is a browser redirect
/// built from the provider settings the backend publishes.
pub struct KeycloakBackend {
    client: Arc<ApiClient>,
    auth_config: OnceCell<AuthConfig>,
}

impl KeycloakBackend {
    pub fn new(client: Arc<ApiClient>) -> Self {
        KeycloakBackend {
            client,
            auth_config: OnceCell::new(),
        }
    }

    /// Provider settings, fetched once and kept for the backend's lifetime.
    pub async fn auth_config(&self) -> Result<&AuthConfig> {
        self.auth_config
            .get_or_try_init(|| async {
                debug!("Fetching identity provider configuration");
                self.client.auth().get_config().await
            })
            .await
    }
}

#[async_trait::async_trait]
impl AuthBackend for KeycloakBackend {
    fn strategy(&self) -> AuthStrategy {
        AuthStrategy::Keycloak
    }

    async fn fetch_user(&self) -> Result<UserResponse> {
        self.client.users().get_me().await
    }

    async fn logout(&self) -> Result<()> {
        self.client.auth().logout().await
    }

    async fn login_redirect_url(&self, redirect_uri: &str) -> Result<Url> {
        self.auth_config().await?.authorization_url(redirect_uri)
    }

    async fn logout_redirect_url(&self, redirect_uri: &str) -> Result<Url> {
        self.auth_config().await?.end_session_url(redirect_uri)
    }
}

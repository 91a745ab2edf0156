use std::sync::Arc;

use super::AuthBackend;
use crate::config::AuthStrategy;
use crate::error::Result;
use crate::gateway::ApiClient;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, TokenResponse, UserResponse};

/// Email/password sessions backed by the API's own JWT endpoints.
pub struct JwtBackend {
    client: Arc<ApiClient>,
}

impl JwtBackend {
    pub fn new(client: Arc<ApiClient>) -> Self {
        JwtBackend { client }
    }
}

#[async_trait::async_trait]
impl AuthBackend for JwtBackend {
    fn strategy(&self) -> AuthStrategy {
        AuthStrategy::JwtBuiltin
    }

    async fn fetch_user(&self) -> Result<UserResponse> {
        self.client.users().get_me().await
    }

    async fn logout(&self) -> Result<()> {
        self.client.auth().logout().await
    }

    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        self.client.auth().login(credentials).await
    }

    async fn register(&self, data: &RegisterRequest) -> Result<UserResponse> {
        self.client.auth().register(data).await
    }

    async fn refresh_tokens(&self) -> Result<TokenResponse> {
        self.client.auth().refresh_token().await
    }
}

use std::sync::Arc;

use reqwest::Url;
use tracing::info;

use super::{jwt_backend::JwtBackend, keycloak_backend::KeycloakBackend, no_auth_backend::NoAuthBackend};
use crate::config::AuthStrategy;
use crate::error::{ClientError, Result};
use crate::gateway::ApiClient;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, TokenResponse, UserResponse};

/// What a session can do against the backend under a given auth strategy.
///
/// Login, registration, token refresh and redirect login are optional
/// capabilities: the default implementations fail with
/// [`ClientError::Unsupported`].
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    fn strategy(&self) -> AuthStrategy;

    /// Whether a stored access token can restore a session on startup.
    fn uses_tokens(&self) -> bool {
        true
    }

    /// Fetches the user the stored token belongs to.
    async fn fetch_user(&self) -> Result<UserResponse>;

    /// Invalidates the session remotely. Local state is the caller's business.
    async fn logout(&self) -> Result<()>;

    async fn login(&self, _credentials: &LoginRequest) -> Result<LoginResponse> {
        Err(unsupported("login", self.strategy()))
    }

    async fn register(&self, _data: &RegisterRequest) -> Result<UserResponse> {
        Err(unsupported("register", self.strategy()))
    }

    async fn refresh_tokens(&self) -> Result<TokenResponse> {
        Err(unsupported("refresh_tokens", self.strategy()))
    }

    /// Where to send the browser to log in with an external identity provider.
    async fn login_redirect_url(&self, _redirect_uri: &str) -> Result<Url> {
        Err(unsupported("login_redirect_url", self.strategy()))
    }

    /// Where to send the browser to end the identity-provider session too.
    async fn logout_redirect_url(&self, _redirect_uri: &str) -> Result<Url> {
        Err(unsupported("logout_redirect_url", self.strategy()))
    }
}

pub(crate) fn unsupported(operation: &'static str, strategy: AuthStrategy) -> ClientError {
    ClientError::Unsupported {
        operation,
        strategy: strategy.as_str(),
    }
}

/// Create the auth backend for a configured strategy.
pub fn create_auth_backend(strategy: AuthStrategy, client: Arc<ApiClient>) -> Box<dyn AuthBackend> {
    info!("Using '{}' auth strategy", strategy.as_str());
    match strategy {
        AuthStrategy::JwtBuiltin => Box::new(JwtBackend::new(client)),
        AuthStrategy::Keycloak => Box::new(KeycloakBackend::new(client)),
        AuthStrategy::None => Box::new(NoAuthBackend::new()),
    }
}

use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::gateway::{ApiClient, RequestOptions};
use crate::models::{
    AuthConfig, Empty, LoginRequest, LoginResponse, RefreshTokenRequest, RegisterRequest,
    TokenKind, TokenResponse, UserResponse,
};

/// `/v1/auth/*` endpoints.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        AuthApi { client }
    }

    /// Exchanges credentials for tokens and stores both of them.
    pub async fn login(&self, data: &LoginRequest) -> Result<LoginResponse> {
        let response: LoginResponse = self
            .client
            .request("/v1/auth/login", RequestOptions::post().json(data)?)
            .await?;
        self.store_tokens(&response.tokens)?;
        info!(user_id = %response.user.id, "Logged in");
        Ok(response)
    }

    /// Creates an account. Does not log the new user in.
    pub async fn register(&self, data: &RegisterRequest) -> Result<UserResponse> {
        self.client
            .request("/v1/auth/register", RequestOptions::post().json(data)?)
            .await
    }

    /// Trades the stored refresh token for a fresh token pair.
    ///
    /// Fails locally with [`ClientError::MissingRefreshToken`] when there is
    /// nothing to trade.
    pub async fn refresh_token(&self) -> Result<TokenResponse> {
        let refresh_token = self
            .client
            .storage()
            .get(TokenKind::Refresh)
            .ok_or(ClientError::MissingRefreshToken)?;

        let response: TokenResponse = self
            .client
            .request(
                "/v1/auth/refresh",
                RequestOptions::post().json(&RefreshTokenRequest { refresh_token })?,
            )
            .await?;
        self.store_tokens(&response)?;
        debug!(expires_in = response.expires_in, "Access token refreshed");
        Ok(response)
    }

    /// Invalidates the session server-side, then drops both stored tokens.
    pub async fn logout(&self) -> Result<()> {
        self.client
            .request::<Empty>("/v1/auth/logout", RequestOptions::post())
            .await?;
        self.client.storage().clear().map_err(ClientError::Storage)
    }

    pub async fn get_me(&self) -> Result<UserResponse> {
        self.client.request("/v1/auth/me", RequestOptions::get()).await
    }

    /// Identity-provider settings, used to start the redirect login flow.
    pub async fn get_config(&self) -> Result<AuthConfig> {
        self.client
            .request("/v1/auth/config", RequestOptions::get())
            .await
    }

    /// Stores the pair, or neither: a half-written pair is rolled back.
    fn store_tokens(&self, tokens: &TokenResponse) -> Result<()> {
        let storage = self.client.storage();
        let stored = storage
            .set(TokenKind::Access, &tokens.access_token)
            .and_then(|_| storage.set(TokenKind::Refresh, &tokens.refresh_token));
        if let Err(e) = stored {
            if let Err(clear_error) = storage.clear() {
                warn!("Failed to roll back partially stored tokens: {}", clear_error);
            }
            return Err(ClientError::Storage(e));
        }
        Ok(())
    }
}

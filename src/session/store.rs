use std::sync::Arc;

use reqwest::Url;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{create_auth_backend, AuthBackend, SessionState};
use crate::config::AuthStrategy;
use crate::error::{ClientError, Result};
use crate::gateway::ApiClient;
use crate::models::{
    LoginRequest, RegisterRequest, TokenKind, TokenResponse, UpdateUserRequest, UserResponse,
};

/// The single source of truth for who is logged in.
///
/// Constructed explicitly and shared by `Arc`; observers follow changes
/// through [`SessionStore::subscribe`]. The store is the only writer of
/// token storage besides the auth endpoints it calls.
pub struct SessionStore {
    client: Arc<ApiClient>,
    backend: Box<dyn AuthBackend>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    pub fn new(client: Arc<ApiClient>, backend: Box<dyn AuthBackend>) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        SessionStore {
            client,
            backend,
            state,
        }
    }

    /// Builds the store with the backend for `strategy`.
    pub fn for_strategy(client: Arc<ApiClient>, strategy: AuthStrategy) -> Self {
        let backend = create_auth_backend(strategy, client.clone());
        Self::new(client, backend)
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn strategy(&self) -> AuthStrategy {
        self.backend.strategy()
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<UserResponse> {
        self.state.borrow().user().cloned()
    }

    /// Always derived from the held user, never tracked separately.
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Receiver that sees every state transition from now on.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn transition(&self, next: SessionState) {
        let previous = self.state.send_replace(next);
        debug!(
            from = previous.name(),
            to = self.state.borrow().name(),
            "Session state changed"
        );
    }

    /// Settles the initial state.
    ///
    /// With a stored access token the current user is fetched; any failure
    /// leaves the session anonymous but keeps the token. Without a token no
    /// request is made.
    pub async fn init(&self) -> SessionState {
        self.transition(SessionState::Checking);

        let has_token = self.client.storage().get(TokenKind::Access).is_some();
        if !self.backend.uses_tokens() || !has_token {
            debug!(has_token, "No session to restore");
            self.transition(SessionState::Anonymous);
            return self.state();
        }

        match self.backend.fetch_user().await {
            Ok(user) => {
                info!(user_id = %user.id, "Restored session");
                self.transition(SessionState::Authenticated(user));
            }
            Err(e) => {
                warn!("Stored token did not restore a session: {}", e);
                self.transition(SessionState::Anonymous);
            }
        }
        self.state()
    }

    /// Drops the held user and returns to `Uninitialized`. Tokens stay put so
    /// a later [`SessionStore::init`] can restore the session.
    pub fn teardown(&self) {
        self.transition(SessionState::Uninitialized);
    }

    /// Logs in with email and password. On failure the state is unchanged.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<UserResponse> {
        let response = self.backend.login(credentials).await?;
        self.transition(SessionState::Authenticated(response.user.clone()));
        Ok(response.user)
    }

    /// Creates an account. The caller still has to log in afterwards.
    pub async fn register(&self, data: &RegisterRequest) -> Result<UserResponse> {
        data.validate()?;
        self.backend.register(data).await
    }

    /// Signs out locally no matter what the backend says.
    pub async fn logout(&self) {
        if let Err(e) = self.backend.logout().await {
            warn!("Remote logout failed, signing out locally anyway: {}", e);
        }
        self.clear_tokens();
        self.transition(SessionState::Anonymous);
        info!("Logged out");
    }

    /// Re-fetches the current user. Failure turns the session anonymous
    /// rather than surfacing an error.
    pub async fn refresh_user(&self) {
        match self.backend.fetch_user().await {
            Ok(user) => self.transition(SessionState::Authenticated(user)),
            Err(e) => {
                debug!("Could not refresh user, session is now anonymous: {}", e);
                self.transition(SessionState::Anonymous);
            }
        }
    }

    /// Rotates the token pair. A failed refresh ends the session.
    pub async fn refresh_tokens(&self) -> Result<TokenResponse> {
        match self.backend.refresh_tokens().await {
            Ok(tokens) => Ok(tokens),
            Err(e @ ClientError::Unsupported { .. }) => Err(e),
            Err(e) => {
                warn!("Token refresh failed, ending session: {}", e);
                self.clear_tokens();
                self.transition(SessionState::Anonymous);
                Err(e)
            }
        }
    }

    /// Updates the caller's profile and keeps the held user in sync.
    pub async fn update_profile(&self, data: &UpdateUserRequest) -> Result<UserResponse> {
        data.validate()?;
        let user = self.client.users().update_me(data).await?;
        self.transition(SessionState::Authenticated(user.clone()));
        Ok(user)
    }

    /// Identity-provider login URL, for strategies that log in by redirect.
    pub async fn login_redirect_url(&self, redirect_uri: &str) -> Result<Url> {
        self.backend.login_redirect_url(redirect_uri).await
    }

    /// Identity-provider logout URL. Call [`SessionStore::logout`] first; this
    /// only ends the provider's own session.
    pub async fn logout_redirect_url(&self, redirect_uri: &str) -> Result<Url> {
        self.backend.logout_redirect_url(redirect_uri).await
    }

    /// Adopts tokens obtained elsewhere (e.g. an identity-provider callback)
    /// and loads the user they belong to. Rejected tokens are discarded.
    pub async fn sign_in_with_token(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<UserResponse> {
        if !self.backend.uses_tokens() {
            return Err(super::backend::unsupported(
                "sign_in_with_token",
                self.strategy(),
            ));
        }

        let storage = self.client.storage();
        storage
            .set(TokenKind::Access, access_token)
            .map_err(ClientError::Storage)?;
        if let Some(refresh_token) = refresh_token {
            storage
                .set(TokenKind::Refresh, refresh_token)
                .map_err(ClientError::Storage)?;
        }

        match self.backend.fetch_user().await {
            Ok(user) => {
                self.transition(SessionState::Authenticated(user.clone()));
                Ok(user)
            }
            Err(e) => {
                self.clear_tokens();
                self.transition(SessionState::Anonymous);
                Err(e)
            }
        }
    }

    fn clear_tokens(&self) {
        if let Err(e) = self.client.storage().clear() {
            warn!("Failed to clear stored tokens: {}", e);
        }
    }
}

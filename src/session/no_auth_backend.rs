use super::backend::unsupported;
use super::AuthBackend;
use crate::config::AuthStrategy;
use crate::error::Result;
use crate::models::UserResponse;

/// For apps generated without authentication: nothing is ever remote.
#[derive(Default)]
pub struct NoAuthBackend;

impl NoAuthBackend {
    pub fn new() -> Self {
        NoAuthBackend
    }
}

#[async_trait::async_trait]
impl AuthBackend for NoAuthBackend {
    fn strategy(&self) -> AuthStrategy {
        AuthStrategy::None
    }

    fn uses_tokens(&self) -> bool {
        false
    }

    async fn fetch_user(&self) -> Result<UserResponse> {
        Err(unsupported("fetch_user", self.strategy()))
    }

    async fn logout(&self) -> Result<()> {
        Ok(())
    }
}

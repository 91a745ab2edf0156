//! Typed endpoint groups layered over the request gateway.

mod auth_api;
mod health_api;
mod users_api;

pub use auth_api::AuthApi;
pub use health_api::HealthApi;
pub use users_api::{UsersApi, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

use crate::gateway::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn health(&self) -> HealthApi<'_> {
        HealthApi::new(self)
    }
}

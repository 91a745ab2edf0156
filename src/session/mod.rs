//! Session store, per-strategy auth backends and the route guard.

pub mod backend;
pub mod guard;
pub mod jwt_backend;
pub mod keycloak_backend;
pub mod no_auth_backend;
mod state;
mod store;

pub use backend::{create_auth_backend, AuthBackend};
pub use guard::{with_auth, Component, Guarded, WithAuth};
pub use state::SessionState;
pub use store::SessionStore;

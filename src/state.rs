//! Shared client context.
//!
//! Bundles what presentation code needs to talk to the backend: the
//! configuration, the request gateway and the session store.

use crate::config::ConfigV1;
use crate::gateway::ApiClient;
use crate::session::{Component, SessionStore, WithAuth};
use std::sync::Arc;

/// Context handed to every consumer of the session.
///
/// Cheap to clone; all members are shared.
#[derive(Clone)]
pub struct AppContext {
    /// Configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Request gateway bound to the configured backend.
    pub client: Arc<ApiClient>,
    /// Who is logged in.
    pub session: Arc<SessionStore>,
}

impl AppContext {
    /// Guards `inner` with the configured login path.
    pub fn with_auth<C: Component>(&self, inner: C) -> WithAuth<C> {
        WithAuth::new(inner).with_login_path(self.config.auth.login_path.clone())
    }
}

//! Client bootstrap.
//!
//! Wires token storage, the request gateway and the session store together
//! from configuration, then settles the initial session state.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ConfigV1;
use crate::error::Result;
use crate::gateway::ApiClient;
use crate::session::{SessionState, SessionStore};
use crate::state::AppContext;
use crate::storage::create_storage;

/// Builds the client context without touching the network.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn build_context(config: Arc<ConfigV1>) -> Result<AppContext> {
    let storage = create_storage(&config.storage);
    let client = Arc::new(ApiClient::new(&config.api, storage)?);
    let session = Arc::new(SessionStore::for_strategy(
        client.clone(),
        config.auth.strategy,
    ));

    Ok(AppContext {
        config,
        client,
        session,
    })
}

/// Builds the context, probes the backend and restores any stored session.
///
/// Health-check failures are logged, not fatal: the session store copes with an
/// unreachable backend by staying anonymous.
///
/// # Errors
///
/// Returns an error if the context cannot be built.
pub async fn run(config: Arc<ConfigV1>) -> Result<AppContext> {
    let context = build_context(config)?;
    info!(
        persistent_tokens = context.client.storage().is_persistent(),
        "Using backend at {}",
        context.client.base_url()
    );

    match context.client.health().check().await {
        Ok(health) => info!(
            service = health.service.as_str(),
            version = health.version.as_str(),
            "Backend is {}",
            health.status
        ),
        Err(e) => warn!("Health check failed: {}", e),
    }
    match context.client.health().ready().await {
        Ok(ready) => info!("Backend readiness: {}", ready.status),
        Err(e) => warn!("Readiness check failed: {}", e),
    }

    match context.session.init().await {
        SessionState::Authenticated(user) => {
            info!("Signed in as {} ({:?})", user.display_name(), user.role)
        }
        state => info!("Session is {}", state.name()),
    }

    Ok(context)
}

use crate::error::Result;
use crate::gateway::{ApiClient, RequestOptions};
use crate::models::HealthResponse;

/// Liveness and readiness probes.
pub struct HealthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> HealthApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        HealthApi { client }
    }

    pub async fn check(&self) -> Result<HealthResponse> {
        self.client.request("/health", RequestOptions::get()).await
    }

    pub async fn ready(&self) -> Result<HealthResponse> {
        self.client.request("/ready", RequestOptions::get()).await
    }
}

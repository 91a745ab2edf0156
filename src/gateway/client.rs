use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::request::RequestOptions;
use crate::config::ApiConfig;
use crate::error::{ClientError, Result};
use crate::models::{ErrorEnvelope, TokenKind};
use crate::storage::TokenStorage;

/// The request gateway: every call to the backend goes through [`ApiClient::request`].
///
/// It reads (never writes) the access token from the shared storage.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    storage: Arc<dyn TokenStorage>,
}

impl ApiClient {
    /// Creates a client for `config.base_url`, reading tokens from `storage`.
    pub fn new(config: &ApiConfig, storage: Arc<dyn TokenStorage>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_in_ms) = config.timeout_in_ms {
            builder = builder.timeout(Duration::from_millis(timeout_in_ms));
        }
        let http = builder.build()?;
        Ok(Self::with_http_client(http, &config.base_url, storage))
    }

    /// Wraps an existing reqwest client, e.g. one with custom TLS settings.
    pub fn with_http_client(
        http: reqwest::Client,
        base_url: &str,
        storage: Arc<dyn TokenStorage>,
    ) -> Self {
        ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            storage,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn storage(&self) -> &Arc<dyn TokenStorage> {
        &self.storage
    }

    /// Full URL for `endpoint` with `params` URL-encoded onto it.
    pub fn build_url(&self, endpoint: &str, params: &[(String, String)]) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, endpoint);
        let mut url =
            Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(url)
    }

    fn build_headers(&self, overrides: HeaderMap) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(overrides);

        // The token is read once here; the request keeps this snapshot even if
        // the session logs out while it is in flight.
        if let Some(token) = self.storage.get(TokenKind::Access) {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                ClientError::Storage("stored access token is not a valid header value".into())
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Sends a request to `endpoint` and parses the JSON response as `T`.
    ///
    /// Non-2xx responses become [`ClientError::Api`] with the backend's error
    /// payload (or an `UNKNOWN` fallback). An empty or non-JSON success body is
    /// treated as `{}`; use [`crate::models::Empty`] when the body is irrelevant.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let RequestOptions {
            method,
            body,
            params,
            headers,
        } = options;

        let url = self.build_url(endpoint, &params)?;
        let headers = self.build_headers(headers)?;
        let authenticated = headers.contains_key(AUTHORIZATION);

        debug!(
            method = %method,
            endpoint,
            authenticated,
            "Sending API request"
        );

        let mut request = self.http.request(method.clone(), url).headers(headers);
        if let Some(body) = &body {
            request = request.body(serde_json::to_vec(body).map_err(ClientError::Encode)?);
        }

        let response = request.send().await.map_err(|e| {
            warn!(method = %method, endpoint, "API request failed to send: {}", e);
            ClientError::Transport(e)
        })?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let error = ErrorEnvelope::parse_or_unknown(&text);
            debug!(
                method = %method,
                endpoint,
                status = status.as_u16(),
                code = error.code.as_str(),
                "API request returned an error"
            );
            return Err(ClientError::Api { status, error });
        }

        let text = response.text().await?;
        let value = parse_success_body(&text, endpoint);
        Ok(serde_json::from_value(value)?)
    }
}

/// Empty or unparseable success bodies become `{}`.
fn parse_success_body(text: &str, endpoint: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Object(Map::new());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                endpoint,
                "Success response from {} is not JSON, treating as empty: {}", endpoint, e
            );
            Value::Object(Map::new())
        }
    }
}

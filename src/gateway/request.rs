use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::ClientError;

/// Everything about a request except its path.
///
/// Defaults to a `GET` with no body, no query and no extra headers.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub params: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        RequestOptions {
            method: Method::GET,
            body: None,
            params: Vec::new(),
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self::with_method(Method::POST)
    }

    pub fn patch() -> Self {
        Self::with_method(Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::with_method(Method::DELETE)
    }

    pub fn with_method(method: Method) -> Self {
        RequestOptions {
            method,
            ..Self::default()
        }
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body).map_err(ClientError::Encode)?);
        Ok(self)
    }

    /// Append a query parameter. Parameters are sent in insertion order.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Set a header, replacing any default of the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

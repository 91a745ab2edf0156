//! Request gateway: URL building, bearer token decoration and error translation.

mod client;
mod request;

pub use client::ApiClient;
pub use request::RequestOptions;

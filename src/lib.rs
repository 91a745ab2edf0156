//! Library exports for lich-client, shared between the binary and tests.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod session;
pub mod startup;
pub mod state;
pub mod storage;
pub mod utils;

pub use error::{ClientError, Result};
pub use gateway::{ApiClient, RequestOptions};
pub use session::{SessionState, SessionStore};

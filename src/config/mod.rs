// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod auth;
#[allow(clippy::module_inception)]
pub mod config;
pub mod logging;
pub mod storage;

pub use auth::*;
pub use config::*;
pub use logging::*;
pub use storage::*;

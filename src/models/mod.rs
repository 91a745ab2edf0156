pub mod auth;
pub mod error;
pub mod health;
pub mod token;
pub mod user;

use serde::{Deserialize, Serialize};

pub use auth::{AuthConfig, LoginRequest, RegisterRequest, UpdateUserRequest};
pub use error::{ApiErrorBody, ErrorEnvelope};
pub use health::HealthResponse;
pub use token::{LoginResponse, RefreshTokenRequest, TokenKind, TokenResponse};
pub use user::{UserListResponse, UserResponse, UserRole, UserStatus};

/// Result type for endpoints whose body is ignored. Accepts `{}` as well as
/// any object with fields we do not care about.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Empty {}

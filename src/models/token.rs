use serde::{Deserialize, Serialize};

use super::user::UserResponse;

/// The two bearer tokens a session may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub const ALL: [TokenKind; 2] = [TokenKind::Access, TokenKind::Refresh];

    /// The fixed storage key for this token.
    pub fn key(&self) -> &'static str {
        match self {
            TokenKind::Access => "access_token",
            TokenKind::Refresh => "refresh_token",
        }
    }
}

/// Tokens minted by `/v1/auth/login` and `/v1/auth/refresh`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub tokens: TokenResponse,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

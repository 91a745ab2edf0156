use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 100;
const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const NAME_MAX: usize = 100;
const AVATAR_URL_MAX: usize = 500;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl RegisterRequest {
    /// Checks the same rules the backend enforces, so obviously bad input
    /// never leaves the client.
    pub fn validate(&self) -> Result<(), ClientError> {
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        if let Some(username) = &self.username {
            validate_username(username)?;
        }
        validate_name("first_name", self.first_name.as_deref())?;
        validate_name("last_name", self.last_name.as_deref())?;
        Ok(())
    }
}

/// Partial profile update; absent fields are left untouched server-side.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), ClientError> {
        validate_name("first_name", self.first_name.as_deref())?;
        validate_name("last_name", self.last_name.as_deref())?;
        if let Some(username) = &self.username {
            validate_username(username)?;
        }
        if let Some(avatar_url) = &self.avatar_url {
            if avatar_url.chars().count() > AVATAR_URL_MAX {
                return Err(invalid(format!(
                    "avatar_url must be at most {} characters",
                    AVATAR_URL_MAX
                )));
            }
        }
        Ok(())
    }
}

/// External identity provider settings served by `/v1/auth/config`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
    pub keycloak_url: String,
    pub realm: String,
    pub client_id: String,
}

impl AuthConfig {
    /// Authorization-code redirect URL for the identity provider's login page.
    pub fn authorization_url(&self, redirect_uri: &str) -> Result<Url, ClientError> {
        let base = format!(
            "{}/realms/{}/protocol/openid-connect/auth",
            self.keycloak_url.trim_end_matches('/'),
            self.realm
        );
        Url::parse_with_params(
            &base,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", "openid email profile"),
            ],
        )
        .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base, e)))
    }

    /// Identity-provider logout URL; the provider sends the browser back to
    /// `post_logout_redirect_uri` afterwards.
    pub fn end_session_url(&self, post_logout_redirect_uri: &str) -> Result<Url, ClientError> {
        let base = format!(
            "{}/realms/{}/protocol/openid-connect/logout",
            self.keycloak_url.trim_end_matches('/'),
            self.realm
        );
        Url::parse_with_params(
            &base,
            &[
                ("client_id", self.client_id.as_str()),
                ("post_logout_redirect_uri", post_logout_redirect_uri),
            ],
        )
        .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base, e)))
    }
}

fn invalid(message: impl Into<String>) -> ClientError {
    ClientError::Validation(message.into())
}

fn validate_email(email: &str) -> Result<(), ClientError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(invalid("email must be a valid address")),
    }
}

fn validate_password(password: &str) -> Result<(), ClientError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Err(invalid(format!(
            "password must be between {} and {} characters",
            PASSWORD_MIN, PASSWORD_MAX
        )));
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(invalid("password must contain at least one uppercase letter"));
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err(invalid("password must contain at least one lowercase letter"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid("password must contain at least one digit"));
    }
    Ok(())
}

fn validate_username(username: &str) -> Result<(), ClientError> {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(invalid(format!(
            "username must be between {} and {} characters",
            USERNAME_MIN, USERNAME_MAX
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(invalid(
            "username can only contain letters, numbers, underscores, and hyphens",
        ));
    }
    Ok(())
}

fn validate_name(field: &str, value: Option<&str>) -> Result<(), ClientError> {
    match value {
        Some(v) if v.chars().count() > NAME_MAX => Err(invalid(format!(
            "{} must be at most {} characters",
            field, NAME_MAX
        ))),
        _ => Ok(()),
    }
}

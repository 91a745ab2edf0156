use crate::models::UserResponse;

/// Lifecycle of a session: `Uninitialized → Checking → Authenticated | Anonymous`.
///
/// Authentication is exactly "a user is held"; a stored token alone never
/// makes a session authenticated.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Checking,
    Authenticated(UserResponse),
    Anonymous,
}

impl SessionState {
    pub fn user(&self) -> Option<&UserResponse> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// True until the initial check has settled.
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Uninitialized | SessionState::Checking)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Checking => "checking",
            SessionState::Authenticated(_) => "authenticated",
            SessionState::Anonymous => "anonymous",
        }
    }
}

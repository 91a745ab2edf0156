//! Access gate for presentation components.
//!
//! This only decides what to show; the backend must still authorize every
//! request on its own.

use super::{SessionState, SessionStore};
use crate::models::UserResponse;

pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Anything that renders for an authenticated user.
pub trait Component {
    type Output;
    fn render(&self, user: &UserResponse) -> Self::Output;
}

impl<F, T> Component for F
where
    F: Fn(&UserResponse) -> T,
{
    type Output = T;

    fn render(&self, user: &UserResponse) -> T {
        self(user)
    }
}

/// What a guarded component resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    /// The session is still being checked.
    Loading,
    /// Nobody is logged in; go to this path.
    Redirect(String),
    Render(T),
}

/// Wraps a component so it only renders for an authenticated session.
pub struct WithAuth<C> {
    inner: C,
    login_path: String,
}

impl<C: Component> WithAuth<C> {
    pub fn new(inner: C) -> Self {
        WithAuth {
            inner,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }

    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn render(&self, session: &SessionStore) -> Guarded<C::Output> {
        // Snapshot first so the component never runs while the state is borrowed.
        let state = session.state();
        self.render_state(&state)
    }

    pub fn render_state(&self, state: &SessionState) -> Guarded<C::Output> {
        match state {
            SessionState::Uninitialized | SessionState::Checking => Guarded::Loading,
            SessionState::Anonymous => Guarded::Redirect(self.login_path.clone()),
            SessionState::Authenticated(user) => Guarded::Render(self.inner.render(user)),
        }
    }
}

/// Shorthand for [`WithAuth::new`].
pub fn with_auth<C: Component>(inner: C) -> WithAuth<C> {
    WithAuth::new(inner)
}

//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the route guard and user-aware collaborators; written only through
//! [`apply`], which the session store calls for each coordinator event.
//!
//! TRANSITIONS
//! ===========
//! Every `*Pending` event raises `loading` and clears `error`. Settled events
//! lower `loading` and either install or clear the user. Logout always clears
//! the user, whatever the server said.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::fmt;

use serde::Serialize;

use crate::net::types::UserProfile;

/// Message describing the last failed identity operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorInfo(String);

impl ErrorInfo {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ErrorInfo {}

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<UserProfile>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<ErrorInfo>,
}

/// Everything that can happen to [`AuthState`].
#[derive(Clone, Debug, PartialEq)]
pub enum AuthEvent {
    RegisterPending,
    RegisterFulfilled(UserProfile),
    RegisterRejected(ErrorInfo),
    LoginPending,
    LoginFulfilled(UserProfile),
    LoginRejected(ErrorInfo),
    LogoutPending,
    LogoutFulfilled,
    LogoutRejected(ErrorInfo),
    CheckPending,
    CheckFulfilled(UserProfile),
    CheckRejected,
    /// Local logout with no server round trip.
    LoggedOut,
}

impl AuthEvent {
    /// Stable name used in log lines.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisterPending => "auth/register/pending",
            Self::RegisterFulfilled(_) => "auth/register/fulfilled",
            Self::RegisterRejected(_) => "auth/register/rejected",
            Self::LoginPending => "auth/login/pending",
            Self::LoginFulfilled(_) => "auth/login/fulfilled",
            Self::LoginRejected(_) => "auth/login/rejected",
            Self::LogoutPending => "auth/logout/pending",
            Self::LogoutFulfilled => "auth/logout/fulfilled",
            Self::LogoutRejected(_) => "auth/logout/rejected",
            Self::CheckPending => "auth/check/pending",
            Self::CheckFulfilled(_) => "auth/check/fulfilled",
            Self::CheckRejected => "auth/check/rejected",
            Self::LoggedOut => "auth/logout",
        }
    }

    /// True for the events that open an operation rather than settle one.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::RegisterPending | Self::LoginPending | Self::LogoutPending | Self::CheckPending)
    }
}

impl AuthState {
    /// True when a signed-in admin is present.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_authenticated && self.user.as_ref().is_some_and(UserProfile::is_admin)
    }

    fn signed_in(user: UserProfile, error: Option<ErrorInfo>) -> Self {
        Self { user: Some(user), is_authenticated: true, loading: false, error }
    }

    fn signed_out(error: Option<ErrorInfo>) -> Self {
        Self { user: None, is_authenticated: false, loading: false, error }
    }
}

/// Apply one event to the state.
#[must_use]
pub fn apply(state: AuthState, event: AuthEvent) -> AuthState {
    match event {
        AuthEvent::RegisterPending | AuthEvent::LoginPending | AuthEvent::LogoutPending | AuthEvent::CheckPending => {
            AuthState { loading: true, error: None, ..state }
        }
        AuthEvent::RegisterFulfilled(user) | AuthEvent::LoginFulfilled(user) => AuthState::signed_in(user, None),
        AuthEvent::RegisterRejected(error) | AuthEvent::LoginRejected(error) | AuthEvent::LogoutRejected(error) => {
            AuthState::signed_out(Some(error))
        }
        // Logout success and a missing session leave the previous error alone.
        AuthEvent::LogoutFulfilled | AuthEvent::CheckRejected => AuthState::signed_out(state.error),
        AuthEvent::CheckFulfilled(user) => AuthState::signed_in(user, state.error),
        AuthEvent::LoggedOut => AuthState::signed_out(None),
    }
}

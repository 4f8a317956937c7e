//! Session coordinator: runs identity operations and feeds their outcomes
//! to the session store.
//!
//! PROTOCOL
//! ========
//! Each operation emits its `*Pending` event, makes exactly one transport
//! call, and emits `*Fulfilled` or `*Rejected` when that call settles. There
//! is no retry and no cancellation.
//!
//! OVERLAP
//! =======
//! Under [`DispatchPolicy::Serialized`] an async mutex admits one operation at
//! a time and `*Pending` is emitted only after admission. Logout is the one
//! exception on the local side: it signs out before queueing, so an operation
//! that never settles cannot hold the user signed in. Under
//! [`DispatchPolicy::Concurrent`] operations overlap and whichever settles
//! last decides `loading`, `error`, and the user.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::config::DispatchPolicy;
use crate::net::api::AuthTransport;
use crate::net::types::{AuthFailure, Credentials, RegisterInput, UserProfile};
use crate::state::auth::{AuthEvent, ErrorInfo};
use crate::state::store::SessionStore;

pub const REGISTER_FAILED: &str = "Registration failed.";
pub const LOGIN_FAILED: &str = "Login failed.";
pub const LOGOUT_FAILED: &str = "Logout failed on the server, but logged out locally.";

#[derive(Clone)]
pub struct SessionCoordinator {
    transport: Arc<dyn AuthTransport>,
    store: SessionStore,
    gate: Option<Arc<Mutex<()>>>,
}

impl SessionCoordinator {
    #[must_use]
    pub fn new(transport: Arc<dyn AuthTransport>, store: SessionStore, policy: DispatchPolicy) -> Self {
        let gate = match policy {
            DispatchPolicy::Serialized => Some(Arc::new(Mutex::new(()))),
            DispatchPolicy::Concurrent => None,
        };
        Self { transport, store, gate }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    async fn admit(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        }
    }

    /// Create an account; on success the new user becomes the current user.
    ///
    /// # Errors
    ///
    /// Returns the service's message (or a fallback) when registration fails.
    pub async fn register(&self, input: &RegisterInput) -> Result<UserProfile, ErrorInfo> {
        let _admitted = self.admit().await;
        self.register_admitted(input).await
    }

    async fn register_admitted(&self, input: &RegisterInput) -> Result<UserProfile, ErrorInfo> {
        self.store.dispatch(AuthEvent::RegisterPending);
        match self.transport.register(input).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "registered");
                self.store.dispatch(AuthEvent::RegisterFulfilled(user.clone()));
                Ok(user)
            }
            Err(failure) => {
                let error = ErrorInfo::new(failure.user_message(REGISTER_FAILED));
                tracing::warn!(error = %failure, "registration rejected");
                self.store.dispatch(AuthEvent::RegisterRejected(error.clone()));
                Err(error)
            }
        }
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the service's message (or a fallback) when login fails.
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile, ErrorInfo> {
        let _admitted = self.admit().await;
        self.store.dispatch(AuthEvent::LoginPending);
        match self.transport.login(credentials).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, role = ?user.role, "logged in");
                self.store.dispatch(AuthEvent::LoginFulfilled(user.clone()));
                Ok(user)
            }
            Err(failure) => {
                let error = ErrorInfo::new(failure.user_message(LOGIN_FAILED));
                tracing::warn!(error = %failure, "login rejected");
                self.store.dispatch(AuthEvent::LoginRejected(error.clone()));
                Err(error)
            }
        }
    }

    /// Log out. The local session is cleared at once, before waiting for
    /// admission, and again when the service call settles.
    ///
    /// # Errors
    ///
    /// Returns an error when the service could not invalidate its cookie; the
    /// local state is already signed out by then.
    pub async fn logout(&self) -> Result<(), ErrorInfo> {
        self.store.logged_out();
        let _admitted = self.admit().await;
        self.store.dispatch(AuthEvent::LogoutPending);
        match self.transport.logout().await {
            Ok(()) => {
                tracing::info!("logged out");
                self.store.dispatch(AuthEvent::LogoutFulfilled);
                Ok(())
            }
            Err(failure) => {
                tracing::error!(error = %failure, "server-side logout failed");
                let error = ErrorInfo::new(LOGOUT_FAILED);
                self.store.dispatch(AuthEvent::LogoutRejected(error.clone()));
                Err(error)
            }
        }
    }

    /// Re-derive the session from the service's cookie. `None` means nobody
    /// is signed in; no error is recorded in that case.
    pub async fn check_session(&self) -> Option<UserProfile> {
        let _admitted = self.admit().await;
        self.check_session_admitted().await
    }

    async fn check_session_admitted(&self) -> Option<UserProfile> {
        self.store.dispatch(AuthEvent::CheckPending);
        match self.transport.check_session().await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "session restored");
                self.store.dispatch(AuthEvent::CheckFulfilled(user.clone()));
                Some(user)
            }
            Err(AuthFailure::NotAuthenticated) => {
                tracing::debug!("no active session");
                self.store.dispatch(AuthEvent::CheckRejected);
                None
            }
            Err(failure) => {
                tracing::warn!(error = %failure, "session check failed");
                self.store.dispatch(AuthEvent::CheckRejected);
                None
            }
        }
    }

    /// Register, then confirm the new session cookie with a session check.
    ///
    /// Both steps run under one admission, so no other operation lands in
    /// between when serialized.
    ///
    /// # Errors
    ///
    /// Returns the registration error; a failed confirmation is reported as
    /// `Ok(None)` with the state reset to signed out.
    pub async fn sign_up(&self, input: &RegisterInput) -> Result<Option<UserProfile>, ErrorInfo> {
        let _admitted = self.admit().await;
        self.register_admitted(input).await?;
        Ok(self.check_session_admitted().await)
    }

    /// Drop the local session without a network call.
    pub fn clear_local(&self) {
        self.store.logged_out();
    }
}

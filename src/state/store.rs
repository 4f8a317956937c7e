//! Owned container for the session state.
//!
//! DESIGN
//! ======
//! One `SessionStore` is created at startup and cloned into every collaborator
//! that needs it. Clones share the same state. Writes happen only through
//! [`SessionStore::dispatch`], which applies the event while holding the watch
//! channel's lock, so readers never observe a half-applied transition.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::Arc;

use tokio::sync::watch;

use super::auth::{AuthEvent, AuthState, apply};

#[derive(Clone, Debug)]
pub struct SessionStore {
    tx: Arc<watch::Sender<AuthState>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Store holding the initial signed-out state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::default());
        Self { tx: Arc::new(tx) }
    }

    /// Clone of the current state.
    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    /// Receiver that is marked changed after every dispatched event.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    /// Apply `event` and notify subscribers.
    pub fn dispatch(&self, event: AuthEvent) {
        let name = event.name();
        let pending = event.is_pending();
        self.tx.send_modify(|state| {
            *state = apply(std::mem::take(state), event);
            tracing::debug!(
                event = name,
                pending,
                authenticated = state.is_authenticated,
                loading = state.loading,
                "session state updated"
            );
        });
    }

    /// Drop the local session without contacting the identity service.
    pub fn logged_out(&self) {
        self.dispatch(AuthEvent::LoggedOut);
    }
}

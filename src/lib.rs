//! # codenest
//!
//! Session manager for the CodeNest problem-solving client.
//!
//! This crate owns the client's view of "who is the current user". It talks to
//! the remote identity service over HTTP, reduces every outcome into a single
//! [`state::auth::AuthState`], and exposes the route guard that decides which
//! views may render for that state.
//!
//! Pages, admin forms, and styling are collaborators outside this crate; they
//! call [`services::session::SessionCoordinator`] and subscribe to
//! [`state::store::SessionStore`].

pub mod config;
pub mod net;
pub mod services;
pub mod state;
pub mod util;

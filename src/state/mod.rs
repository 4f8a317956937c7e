//! Client-side session state.
//!
//! DESIGN
//! ======
//! `auth` is the pure model (state, events, transition function); `store` is
//! the owned container that applies events and notifies subscribers.

pub mod auth;
pub mod store;

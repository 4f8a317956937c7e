//! Async services driving the session state.

pub mod session;

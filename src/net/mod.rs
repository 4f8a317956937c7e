//! Network layer for the identity service.
//!
//! DESIGN
//! ======
//! `types` holds the wire payloads and failure taxonomy; `api` holds the
//! transport trait and its `reqwest` implementation.

pub mod api;
pub mod types;

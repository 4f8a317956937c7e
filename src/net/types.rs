//! Wire types shared by the identity transport and the session state.
//!
//! DESIGN
//! ======
//! The identity service promises little about its profiles: it guarantees an id and,
//! for admins, a role. Every other profile field is kept verbatim in
//! [`UserProfile::extra`] so collaborators can read what they need without
//! this crate knowing about it.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned by the identity service. Numeric ids and document ids
/// (`"_id": "65f…"`) are both seen in practice.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Access level of a user. Only `Admin` unlocks the `/admin` views.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Profile of the authenticated user as returned by the identity service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: UserId,
    #[serde(rename = "displayName", alias = "firstName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Body of `POST /user/register`.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub first_name: String,
    pub email_id: String,
    pub password: String,
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput")
            .field("first_name", &self.first_name)
            .field("email_id", &self.email_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /user/login`.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email_id: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email_id", &self.email_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `{ "user": … }` envelope used by register, login, and check.
#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: UserProfile,
}

/// Why an identity operation did not produce a value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    /// No response reached the client.
    #[error("transport error: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("identity service rejected request with status {status}")]
    Rejected { status: u16, message: Option<String> },
    /// 401 on a session check; the expected "nobody is logged in" answer.
    #[error("no active session")]
    NotAuthenticated,
    /// A success status whose body was not the expected payload.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl AuthFailure {
    /// Human-readable message for this failure, or `fallback` when there is
    /// nothing better to show.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        let message = match self {
            Self::Rejected { message: Some(message), .. } => message.clone(),
            Self::Rejected { status, message: None } => format!("request failed with status code {status}"),
            Self::Transport(detail) | Self::Decode(detail) => detail.clone(),
            Self::NotAuthenticated => String::new(),
        };
        if message.trim().is_empty() { fallback.to_owned() } else { message }
    }
}

/// Pull a message out of an error response body.
///
/// Accepts `{"message": "…"}`, a bare JSON string, or plain text.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => map
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned),
        Ok(serde_json::Value::String(text)) => Some(text),
        Ok(_) => None,
        Err(_) => Some(trimmed.to_owned()),
    }
}

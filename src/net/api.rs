//! Identity service transport.
//!
//! The four identity operations go through [`AuthTransport`] so the session
//! coordinator can run against the real HTTP service or an in-memory fake.
//!
//! SESSION COOKIE
//! ==============
//! The service identifies the session with a cookie it sets on register/login
//! and clears on logout. [`HttpAuthTransport`] keeps a cookie jar for the life
//! of the client and replays it on every request; no token is held anywhere
//! else.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};

use super::types::{AuthFailure, Credentials, RegisterInput, UserEnvelope, UserProfile, extract_error_message};
use crate::config::ClientConfig;

pub const REGISTER_PATH: &str = "/user/register";
pub const LOGIN_PATH: &str = "/user/login";
pub const LOGOUT_PATH: &str = "/user/logout";
pub const CHECK_PATH: &str = "/user/check";

/// The identity operations the session coordinator depends on.
#[async_trait]
pub trait AuthTransport: Send + Sync {
    /// Create an account and start a session for it.
    async fn register(&self, input: &RegisterInput) -> Result<UserProfile, AuthFailure>;

    /// Start a session for existing credentials.
    async fn login(&self, credentials: &Credentials) -> Result<UserProfile, AuthFailure>;

    /// Ask the service to invalidate the session cookie.
    async fn logout(&self) -> Result<(), AuthFailure>;

    /// Ask whether the current cookie still identifies a session.
    ///
    /// Returns [`AuthFailure::NotAuthenticated`] when it does not.
    async fn check_session(&self) -> Result<UserProfile, AuthFailure>;
}

/// [`AuthTransport`] over HTTP with a persistent cookie jar.
#[derive(Clone, Debug)]
pub struct HttpAuthTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthTransport {
    /// Build a transport for `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be constructed
    /// (for example when the TLS backend fails to initialize).
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self { client: builder.build()?, base_url: config.base_url.clone() })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder, path: &'static str) -> Result<Response, AuthFailure> {
        let response = request.send().await.map_err(|e| {
            tracing::debug!(path, error = %e, "identity request failed before a response");
            AuthFailure::Transport(e.to_string())
        })?;
        tracing::debug!(path, status = response.status().as_u16(), "identity response");
        Ok(response)
    }
}

#[async_trait]
impl AuthTransport for HttpAuthTransport {
    async fn register(&self, input: &RegisterInput) -> Result<UserProfile, AuthFailure> {
        let request = self.client.post(self.endpoint(REGISTER_PATH)).json(input);
        let response = self.send(request, REGISTER_PATH).await?;
        read_user(response).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<UserProfile, AuthFailure> {
        let request = self.client.post(self.endpoint(LOGIN_PATH)).json(credentials);
        let response = self.send(request, LOGIN_PATH).await?;
        read_user(response).await
    }

    async fn logout(&self) -> Result<(), AuthFailure> {
        let request = self
            .client
            .post(self.endpoint(LOGOUT_PATH))
            .json(&serde_json::json!({}));
        let response = self.send(request, LOGOUT_PATH).await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(())
    }

    async fn check_session(&self) -> Result<UserProfile, AuthFailure> {
        let request = self.client.get(self.endpoint(CHECK_PATH));
        let response = self.send(request, CHECK_PATH).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AuthFailure::NotAuthenticated);
        }
        read_user(response).await
    }
}

/// Decode a `{ "user": … }` success body, or turn the response into a rejection.
async fn read_user(response: Response) -> Result<UserProfile, AuthFailure> {
    if !response.status().is_success() {
        return Err(rejection(response).await);
    }
    let body = response
        .text()
        .await
        .map_err(|e| AuthFailure::Transport(e.to_string()))?;
    serde_json::from_str::<UserEnvelope>(&body)
        .map(|envelope| envelope.user)
        .map_err(|e| AuthFailure::Decode(e.to_string()))
}

async fn rejection(response: Response) -> AuthFailure {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    AuthFailure::Rejected { status, message: extract_error_message(&body) }
}

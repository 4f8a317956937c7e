//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

pub const BASE_URL_VAR: &str = "CODENEST_BASE_URL";
pub const REQUEST_TIMEOUT_VAR: &str = "CODENEST_REQUEST_TIMEOUT_SECS";
pub const SERIALIZE_ACTIONS_VAR: &str = "CODENEST_SERIALIZE_ACTIONS";

/// Whether identity operations may overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchPolicy {
    /// One identity operation at a time, in admission order.
    #[default]
    Serialized,
    /// Operations overlap; the last one to settle decides the state.
    Concurrent,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL '{0}' (expected http:// or https://)")]
    InvalidBaseUrl(String),
    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Identity service root, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout on the HTTP client. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    pub dispatch: DispatchPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_owned(), request_timeout: None, dispatch: DispatchPolicy::default() }
    }
}

impl ClientConfig {
    /// Config for `base_url` with default timeout and dispatch policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] unless the URL is http(s).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self { base_url: normalize_base_url(base_url)?, ..Self::default() })
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CODENEST_BASE_URL`: default `http://localhost:3000`
    /// - `CODENEST_REQUEST_TIMEOUT_SECS`: unset or `0` disables the timeout
    /// - `CODENEST_SERIALIZE_ACTIONS`: boolean, default true
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = normalize_base_url(lookup(BASE_URL_VAR).as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        let request_timeout = match lookup(REQUEST_TIMEOUT_VAR) {
            None => None,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => return Err(ConfigError::InvalidValue { var: REQUEST_TIMEOUT_VAR, value: raw }),
            },
        };

        let dispatch = match lookup(SERIALIZE_ACTIONS_VAR) {
            None => DispatchPolicy::Serialized,
            Some(raw) => match parse_bool(&raw) {
                Some(true) => DispatchPolicy::Serialized,
                Some(false) => DispatchPolicy::Concurrent,
                None => return Err(ConfigError::InvalidValue { var: SERIALIZE_ACTIONS_VAR, value: raw }),
            },
        };

        Ok(Self { base_url, request_timeout, dispatch })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = ["http://", "https://"]
        .into_iter()
        .any(|scheme| trimmed.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()));
    if !has_host {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

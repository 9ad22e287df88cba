//! Client configuration.

use std::env;

pub const DEFAULT_BASE_URL: &str = "http://localhost:9000";
pub const BASE_URL_VAR: &str = "TUS_LIBROS_URL";
pub const SESSION_TOKEN_VAR: &str = "TUS_LIBROS_SESSION_TOKEN";

/// Where the service lives and which session, if any, to present.
///
/// The session token is passed to the dispatcher explicitly and only sent
/// for endpoints whose `requires_auth()` is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    session_token: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Read `TUS_LIBROS_URL` and `TUS_LIBROS_SESSION_TOKEN`, falling back to
    /// the local default service and no session.
    pub fn from_env() -> Self {
        let base_url = env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let config = Self::new(&base_url);
        match env::var(SESSION_TOKEN_VAR) {
            Ok(token) if !token.is_empty() => config.with_session_token(token),
            _ => config,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

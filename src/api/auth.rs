//! Credentials as an explicit dependency.
//!
//! The token is never process-global: the client is constructed with a
//! [`CredentialsProvider`] and reads it on every request. An
//! application typically owns one [`SessionCredentials`], shares it
//! with the client, fills it from [`LoginResponse::token`] on login and
//! clears it on logout.
//!
//! [`LoginResponse::token`]: crate::models::LoginResponse

use std::sync::RwLock;

pub trait CredentialsProvider: Send + Sync {
    /// The bearer token to attach, or `None` for anonymous requests.
    fn bearer_token(&self) -> Option<String>;
}

/// Fixed token, for scripts and tests.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl CredentialsProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// No credentials; requests go out without an Authorization header.
pub struct Anonymous;

impl CredentialsProvider for Anonymous {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// Mutable login-session token store.
pub struct SessionCredentials {
    token: RwLock<Option<String>>,
}

impl SessionCredentials {
    pub fn new() -> Self {
        Self {
            token: RwLock::new(None),
        }
    }

    /// Store the token returned by a successful login.
    pub fn set_token(&self, token: impl Into<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.into());
        }
    }

    /// Drop the token on logout.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }
}

impl Default for SessionCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialsProvider for SessionCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }
}

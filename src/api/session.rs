//! Authenticated session passed explicitly to every API call

use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    /// Login identity, when the session came from `login`
    pub user: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: Option<String>) -> Self {
        Self { token: token.into(), user }
    }

    /// Session for a pre-issued token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(token, None)
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// Keep the bearer token out of logs
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

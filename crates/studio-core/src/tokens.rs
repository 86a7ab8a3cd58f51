//! Token types for backend authentication.

use std::fmt;

/// A short-lived access token sent as a bearer credential.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in authorization headers.
    ///
    /// # Security
    ///
    /// Use only when constructing HTTP authorization headers or persisting
    /// the session.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// A longer-lived refresh token used only to obtain a new access token.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Create a new refresh token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in refresh requests.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}

/// An access token together with the refresh token that renews it.
///
/// A session is either a full pair or nothing: there is no way to hold an
/// access token here without the refresh token that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    access: AccessToken,
    refresh: RefreshToken,
}

impl TokenPair {
    /// Create a token pair.
    pub fn new(access: AccessToken, refresh: RefreshToken) -> Self {
        Self { access, refresh }
    }

    /// Build a pair from raw strings, as read from storage or the wire.
    pub fn from_strings(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self::new(AccessToken::new(access), RefreshToken::new(refresh))
    }

    /// Assemble a pair from optional halves. Returns `None` unless both are present.
    pub fn from_parts(access: Option<String>, refresh: Option<String>) -> Option<Self> {
        match (access, refresh) {
            (Some(access), Some(refresh)) => Some(Self::from_strings(access, refresh)),
            _ => None,
        }
    }

    /// The access token.
    pub fn access(&self) -> &AccessToken {
        &self.access
    }

    /// The refresh token.
    pub fn refresh(&self) -> &RefreshToken {
        &self.refresh
    }

    /// Split the pair into its tokens.
    pub fn into_parts(self) -> (AccessToken, RefreshToken) {
        (self.access, self.refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_hides_value_in_debug() {
        let token = AccessToken::new("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("eyJ"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn pair_debug_redacts_both() {
        let pair = TokenPair::from_strings("access-secret", "refresh-secret");
        let debug = format!("{:?}", pair);
        assert!(!debug.contains("access-secret"));
        assert!(!debug.contains("refresh-secret"));
    }

    #[test]
    fn pair_requires_both_halves() {
        assert!(TokenPair::from_parts(Some("a".into()), None).is_none());
        assert!(TokenPair::from_parts(None, Some("r".into())).is_none());

        let pair = TokenPair::from_parts(Some("a".into()), Some("r".into())).unwrap();
        assert_eq!(pair.access().as_str(), "a");
        assert_eq!(pair.refresh().as_str(), "r");
    }
}

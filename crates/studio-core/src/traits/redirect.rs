//! Login redirect signal.

/// Receives the signal to send the user back to the login entry point.
///
/// Raised once per terminal authentication failure, after the session has
/// been cleared from the [`TokenStore`](crate::TokenStore).
pub trait LoginRedirect: Send + Sync {
    /// Navigate to `route`, the application's login entry point.
    fn redirect_to_login(&self, route: &str);
}

/// A redirect target that ignores the signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRedirect;

impl LoginRedirect for NoopRedirect {
    fn redirect_to_login(&self, _route: &str) {}
}

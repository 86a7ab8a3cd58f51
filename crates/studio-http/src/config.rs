//! Client configuration.

use std::time::Duration;

use studio_core::ApiUrl;

/// Route the embedding application uses as its login entry point.
pub const DEFAULT_LOGIN_ROUTE: &str = "/admin/login";

/// Timeout applied to every request, refresh calls included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for an [`AuthClient`](crate::AuthClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api: ApiUrl,
    login_route: String,
    timeout: Duration,
    user_agent: String,
}

impl ClientConfig {
    /// Create a configuration for the backend at `api` with default settings.
    pub fn new(api: ApiUrl) -> Self {
        Self {
            api,
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("studio/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the route passed to the login redirect.
    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The backend base URL.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// The login entry point route.
    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The User-Agent header value.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

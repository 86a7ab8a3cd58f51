//! studio-http - Authenticated HTTP client for the studio backend.
//!
//! [`AuthClient`] attaches the stored access token to every request. When
//! the backend answers `401`, the client renews the token pair once per
//! wave of concurrent failures and replays the rejected requests; when the
//! renewal fails it clears the session and signals the login redirect.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use studio_core::{ApiUrl, Credentials, MemoryTokenStore};
//! use studio_http::{AuthClient, ClientConfig};
//!
//! # async fn example() -> Result<(), studio_core::Error> {
//! let config = ClientConfig::new(ApiUrl::new("https://api.studio.example")?);
//! let client = AuthClient::new(config, Arc::new(MemoryTokenStore::new()))?;
//!
//! client.login(Credentials::new("owner@studio.example", "secret")).await?;
//! for photo in client.admin_photos().await? {
//!     println!("{:?}", photo.title);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
mod refresh;
mod resources;
mod session;

pub use config::{ClientConfig, DEFAULT_LOGIN_ROUTE, DEFAULT_TIMEOUT};
pub use http::{ApiRequest, ApiResponse, Method, endpoints};
pub use session::AuthClient;

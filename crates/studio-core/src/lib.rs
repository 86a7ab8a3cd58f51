//! studio-core - Core types and traits for the studio backend client.
//!
//! Everything the authenticated client and its front ends share lives here:
//! the token types, the error taxonomy, the API base URL, the resource
//! models and the [`TokenStore`] / [`LoginRedirect`] seams.

pub mod credentials;
pub mod error;
pub mod models;
pub mod store;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::Credentials;
pub use error::{ApiError, AuthError, AuthErrorCode, Error};
pub use models::{Photo, Testimonial, TestimonialSubmission, User};
pub use store::MemoryTokenStore;
pub use tokens::{AccessToken, RefreshToken, TokenPair};
pub use traits::{LoginRedirect, NoopRedirect, TokenStore};
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

//! Persistent session storage trait.

use async_trait::async_trait;

use crate::{Result, TokenPair};

/// Key under which the access token is stored.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Key under which the refresh token is stored.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Key under which the JSON-encoded user is stored.
pub const USER_KEY: &str = "user";

/// Persistent storage for the session token pair and the signed-in user.
///
/// Implementations must write and remove the two tokens as one unit: a
/// reader never observes the new access token next to the old refresh token,
/// and a store holding only one of them reports no session at all.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the stored token pair, if a complete one exists.
    async fn load_tokens(&self) -> Result<Option<TokenPair>>;

    /// Load the stored user object.
    async fn load_user(&self) -> Result<Option<serde_json::Value>>;

    /// Replace the token pair, keeping the stored user.
    async fn save_tokens(&self, tokens: &TokenPair) -> Result<()>;

    /// Replace the whole session (token pair and user) after a login.
    async fn save_session(&self, tokens: &TokenPair, user: &serde_json::Value) -> Result<()>;

    /// Remove the token pair and user.
    async fn clear(&self) -> Result<()>;
}

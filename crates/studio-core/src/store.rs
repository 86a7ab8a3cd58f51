//! In-memory token store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::traits::TokenStore;
use crate::{Result, TokenPair};

#[derive(Debug, Default)]
struct MemorySession {
    tokens: Option<TokenPair>,
    user: Option<serde_json::Value>,
}

/// A [`TokenStore`] that keeps the session in process memory.
///
/// Useful for tests and for embedding the client where persistence is
/// handled elsewhere.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: RwLock<MemorySession>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a session.
    pub fn with_session(tokens: TokenPair, user: Option<serde_json::Value>) -> Self {
        Self {
            session: RwLock::new(MemorySession {
                tokens: Some(tokens),
                user,
            }),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load_tokens(&self) -> Result<Option<TokenPair>> {
        Ok(self.session.read().await.tokens.clone())
    }

    async fn load_user(&self) -> Result<Option<serde_json::Value>> {
        Ok(self.session.read().await.user.clone())
    }

    async fn save_tokens(&self, tokens: &TokenPair) -> Result<()> {
        self.session.write().await.tokens = Some(tokens.clone());
        Ok(())
    }

    async fn save_session(&self, tokens: &TokenPair, user: &serde_json::Value) -> Result<()> {
        let mut session = self.session.write().await;
        session.tokens = Some(tokens.clone());
        session.user = Some(user.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.session.write().await = MemorySession::default();
        Ok(())
    }
}

//! Authenticated client with transparent token refresh.

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, instrument, warn};

use studio_core::error::InvalidInputError;
use studio_core::{
    AccessToken, ApiError, AuthError, Credentials, Error, LoginRedirect, NoopRedirect, Result,
    TokenPair, TokenStore, User,
};

use crate::config::ClientConfig;
use crate::http::endpoints::{
    LOGIN, LoginRequest, LoginResponse, REFRESH_TOKEN, RefreshRequest, RefreshResponse,
};
use crate::http::{ApiRequest, ApiResponse, HttpClient};
use crate::refresh::{RefreshCoordinator, RefreshFailure, Renewal};

/// Client for the studio backend that manages the session token pair.
///
/// Every request carries the stored access token. A `401` triggers one
/// refresh per wave of concurrent failures, after which the rejected
/// requests are replayed once. If the refresh fails, or a replayed request
/// is rejected again, the session is removed from the [`TokenStore`] and the
/// [`LoginRedirect`] is signalled.
///
/// # Thread Safety
///
/// Clients are cheap to clone (they use internal `Arc`) and all clones share
/// one refresh coordinator, so refresh waves span every clone.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    http: HttpClient,
    store: Arc<dyn TokenStore>,
    redirect: Arc<dyn LoginRedirect>,
    refresh: RefreshCoordinator,
}

impl AuthClient {
    /// Create a client that ignores the login redirect signal.
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        Self::with_redirect(config, store, Arc::new(NoopRedirect))
    }

    /// Create a client that reports terminal auth failures to `redirect`.
    pub fn with_redirect(
        config: ClientConfig,
        store: Arc<dyn TokenStore>,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Result<Self> {
        let http = HttpClient::new(&config)?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                http,
                store,
                redirect,
                refresh: RefreshCoordinator::new(),
            }),
        })
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The token store backing this client.
    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.store
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Exchange credentials for a token pair and store the new session.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] when the backend answers `401`.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: Credentials) -> Result<User> {
        info!("Logging in");

        let request = LoginRequest {
            email: credentials.email(),
            password: credentials.password(),
        };

        let response: LoginResponse = match self.inner.http.post_json(LOGIN, &request).await {
            Ok(response) => response,
            Err(Error::Api(err)) if err.is_unauthorized() => {
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(err) => return Err(err),
        };

        let payload = response.into_payload();
        let refresh = payload
            .tokens
            .refresh_token
            .ok_or_else(|| Error::decode("login response carries no refresh token"))?;
        let tokens = TokenPair::from_strings(payload.tokens.access_token, refresh);

        let user: User = if payload.user.is_null() {
            User::default()
        } else {
            serde_json::from_value(payload.user.clone()).map_err(Error::decode)?
        };

        self.inner.store.save_session(&tokens, &payload.user).await?;
        debug!(user = user.display_name(), "Session stored");
        Ok(user)
    }

    /// Remove the stored session. The backend keeps no server-side session.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        info!("Logging out");
        self.inner.store.clear().await
    }

    /// Renew the token pair now.
    ///
    /// Joins the refresh already in flight if there is one.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let epoch = self.inner.refresh.epoch();
        let renewal = self
            .inner
            .refresh
            .renew(epoch, || self.refresh_wave())
            .await
            .map_err(|failure| AuthError::RefreshFailed {
                reason: failure.reason,
            })?;

        // A wave that settled just before this call may have ended the session.
        if renewal == Renewal::Settled && !self.is_authenticated().await? {
            return Err(AuthError::NotLoggedIn.into());
        }
        Ok(())
    }

    /// Whether a complete token pair is stored.
    pub async fn is_authenticated(&self) -> Result<bool> {
        Ok(self.inner.store.load_tokens().await?.is_some())
    }

    /// The user stored at login, if a session exists.
    pub async fn current_user(&self) -> Result<Option<User>> {
        if !self.is_authenticated().await? {
            return Ok(None);
        }
        match self.inner.store.load_user().await? {
            Some(user) if !user.is_null() => {
                serde_json::from_value(user).map(Some).map_err(Error::decode)
            }
            _ => Ok(Some(User::default())),
        }
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Send a request with the stored access token, refreshing on `401`.
    ///
    /// Success statuses are returned as a response; any other status comes
    /// back as [`Error::Api`] unchanged, except `401`, which is recovered by
    /// refresh-and-retry or reported as [`AuthError`].
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        let epoch = self.inner.refresh.epoch();
        let token = self.current_access_token().await?;

        let response = self.inner.http.send(&request, token.as_ref()).await?;
        if response.status() != 401 {
            return response.error_for_status();
        }

        let rejected = response.api_error();
        debug!(code = ?rejected.code, "Request rejected with 401");

        let Some(sent) = token else {
            self.end_session("request rejected without a session").await;
            return Err(AuthError::Unauthorized(rejected).into());
        };

        let token = self.renew(epoch, &sent, rejected).await?;
        request.mark_retried();

        let response = self.inner.http.send(&request, Some(&token)).await?;
        if response.status() == 401 {
            self.end_session("retried request rejected").await;
            return Err(AuthError::Unauthorized(response.api_error()).into());
        }
        response.error_for_status()
    }

    /// GET a path and decode the JSON response.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.send(ApiRequest::get(path)).await?.json()
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(ApiRequest::post(path).json(to_json(body)?))
            .await?
            .json()
    }

    /// PUT a JSON body and decode the JSON response.
    pub async fn put_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(ApiRequest::put(path).json(to_json(body)?))
            .await?
            .json()
    }

    /// DELETE a path, ignoring any response body.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(ApiRequest::delete(path)).await.map(|_| ())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn current_access_token(&self) -> Result<Option<AccessToken>> {
        Ok(self
            .inner
            .store
            .load_tokens()
            .await?
            .map(|tokens| tokens.into_parts().0))
    }

    /// Get a token to replay a request that sent `sent` during `epoch` and
    /// was turned away with `rejected`.
    ///
    /// When a wave settled in the meantime the stored token is reused, unless
    /// it is the very token the backend just rejected.
    async fn renew(
        &self,
        mut epoch: u64,
        sent: &AccessToken,
        rejected: ApiError,
    ) -> Result<AccessToken> {
        loop {
            let renewal = self
                .inner
                .refresh
                .renew(epoch, || self.refresh_wave())
                .await
                .map_err(|failure| AuthError::RefreshFailed {
                    reason: failure.reason,
                })?;

            match renewal {
                Renewal::Refreshed(token) => return Ok(token),
                Renewal::Settled => match self.current_access_token().await? {
                    Some(token) if &token != sent => {
                        debug!("Token renewed by an earlier wave");
                        return Ok(token);
                    }
                    Some(_) => {
                        debug!("Rejected token is still current, refreshing");
                        epoch = self.inner.refresh.epoch();
                    }
                    // An earlier wave failed and already ended the session.
                    None => return Err(AuthError::Unauthorized(rejected).into()),
                },
            }
        }
    }

    /// Body of a refresh wave, run by the wave's leader only.
    async fn refresh_wave(&self) -> std::result::Result<AccessToken, RefreshFailure> {
        match self.request_new_tokens().await {
            Ok(tokens) => match self.inner.store.save_tokens(&tokens).await {
                Ok(()) => {
                    info!("Session refreshed");
                    Ok(tokens.into_parts().0)
                }
                Err(err) => {
                    warn!(error = %err, "Could not store refreshed tokens");
                    self.end_session("refreshed tokens could not be stored")
                        .await;
                    Err(RefreshFailure::new(err.to_string()))
                }
            },
            Err(err) => {
                warn!(error = %err, "Token refresh failed");
                self.end_session("token refresh failed").await;
                Err(RefreshFailure::new(err.to_string()))
            }
        }
    }

    async fn request_new_tokens(&self) -> Result<TokenPair> {
        let current = self
            .inner
            .store
            .load_tokens()
            .await?
            .ok_or(AuthError::NotLoggedIn)?;
        let refresh_token = current.refresh().as_str();

        let response: RefreshResponse = self
            .inner
            .http
            .post_json(REFRESH_TOKEN, &RefreshRequest { refresh_token })
            .await?;

        Ok(response.into_pair(refresh_token))
    }

    /// Clear the stored session and signal the login redirect.
    async fn end_session(&self, reason: &str) {
        warn!(reason, "Ending session");
        if let Err(err) = self.inner.store.clear().await {
            warn!(error = %err, "Could not clear stored session");
        }
        self.inner
            .redirect
            .redirect_to_login(self.inner.config.login_route());
    }
}

fn to_json<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| {
        InvalidInputError::Other {
            message: e.to_string(),
        }
        .into()
    })
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("api", self.inner.config.api())
            .field("refresh_in_progress", &self.inner.refresh.in_progress())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::{ApiUrl, MemoryTokenStore};

    fn client(store: MemoryTokenStore) -> AuthClient {
        let config = ClientConfig::new(ApiUrl::new("http://127.0.0.1:9").unwrap());
        AuthClient::new(config, Arc::new(store)).unwrap()
    }

    #[tokio::test]
    async fn fresh_client_is_signed_out() {
        let client = client(MemoryTokenStore::new());
        assert!(!client.is_authenticated().await.unwrap());
        assert!(client.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn current_user_reads_store() {
        let store = MemoryTokenStore::with_session(
            TokenPair::from_strings("A1", "R1"),
            Some(serde_json::json!({"id": "u1", "name": "Studio Owner"})),
        );
        let client = client(store);
        let user = client.current_user().await.unwrap().unwrap();
        assert_eq!(user.display_name(), "Studio Owner");
    }

    #[tokio::test]
    async fn logout_clears_pair() {
        let store = MemoryTokenStore::with_session(TokenPair::from_strings("A1", "R1"), None);
        let client = client(store);
        client.logout().await.unwrap();
        assert!(!client.is_authenticated().await.unwrap());
    }

    #[test]
    fn debug_hides_store() {
        let client = client(MemoryTokenStore::new());
        let debug = format!("{:?}", client);
        assert!(debug.contains("127.0.0.1"));
        assert!(!debug.contains("A1"));
    }
}

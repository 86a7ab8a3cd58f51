//! Raw HTTP client for the studio backend.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use studio_core::error::{InvalidInputError, TransportError};
use studio_core::{AccessToken, ApiUrl, Error, Result};

use crate::config::ClientConfig;

use super::request::{ApiRequest, ApiResponse};

/// Map a reqwest failure onto the transport error variants.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let err = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(err)
}

/// HTTP client that knows the backend base URL but nothing about sessions.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    api: ApiUrl,
}

impl HttpClient {
    /// Build a client from the configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.timeout())
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            api: config.api().clone(),
        })
    }

    /// Send a request, attaching `token` as a bearer credential when given.
    ///
    /// Any status is returned as a response; only transport failures are errors.
    #[instrument(skip(self, request, token), fields(method = %request.method(), path = request.path()))]
    pub async fn send(
        &self,
        request: &ApiRequest,
        token: Option<&AccessToken>,
    ) -> Result<ApiResponse> {
        let url = self.api.endpoint(request.path());
        debug!(authed = token.is_some(), retried = request.is_retried(), "HTTP request");

        let mut builder = self
            .client
            .request(request.method().clone(), &url)
            .headers(extra_headers(request)?);

        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, bearer(token)?);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(transport_error)?.to_vec();
        trace!(status, bytes = body.len(), "HTTP response");

        Ok(ApiResponse::new(status, headers, body))
    }

    /// POST a JSON body without credentials and decode a JSON reply.
    ///
    /// Non-success statuses come back as [`Error::Api`].
    #[instrument(skip(self, body))]
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(|e| InvalidInputError::Other {
            message: e.to_string(),
        })?;
        let request = ApiRequest::post(path).json(body);
        self.send(&request, None).await?.error_for_status()?.json()
    }
}

fn bearer(token: &AccessToken) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str())).map_err(|_| {
        InvalidInputError::Header {
            name: AUTHORIZATION.to_string(),
            reason: "token contains characters not allowed in a header".to_string(),
        }
    })?;
    value.set_sensitive(true);
    Ok(value)
}

fn extra_headers(request: &ApiRequest) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in request.headers() {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| InvalidInputError::Header {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        if header_name == AUTHORIZATION {
            return Err(InvalidInputError::Header {
                name: name.clone(),
                reason: "authorization is managed by the client".to_string(),
            }
            .into());
        }
        let header_value = HeaderValue::from_str(value).map_err(|e| InvalidInputError::Header {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        headers.append(header_name, header_value);
    }
    Ok(headers)
}

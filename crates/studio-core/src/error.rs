//! Error types for the studio client.
//!
//! A single [`Error`] enum with explicit variants for transport,
//! authentication, API, decoding, input validation and storage failures.

use std::fmt;
use thiserror::Error;

/// The unified error type for studio client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No response was received (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication failed and could not be recovered.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The backend answered with a non-success status.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The response body did not have the expected shape.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// Input validation errors (base URL, header values).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// The token store could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Build a decode error from anything displayable.
    pub fn decode(err: impl fmt::Display) -> Self {
        Error::Decode {
            message: err.to_string(),
        }
    }

    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => Some(err.status),
            Error::Auth(AuthError::Unauthorized(err)) => Some(err.status),
            _ => None,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP client error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The login endpoint rejected the credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No token pair is stored.
    #[error("not logged in")]
    NotLoggedIn,

    /// The backend answered 401 and the session could not be renewed.
    /// Carries the rejection as the backend sent it.
    #[error("unauthorized: {0}")]
    Unauthorized(ApiError),

    /// The refresh call failed; the session has been cleared.
    #[error("token refresh failed: {reason}")]
    RefreshFailed { reason: String },
}

/// Backend error codes relevant to authentication.
///
/// Decoded leniently: `TOKEN_EXPIRED`, `token-expired` and `TokenExpired`
/// all map to [`AuthErrorCode::TokenExpired`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorCode {
    /// The access token is past its expiry.
    TokenExpired,
    /// The token failed verification.
    InvalidToken,
    /// Any other code, kept verbatim.
    Other(String),
}

impl AuthErrorCode {
    /// Decode a backend-supplied code string.
    pub fn parse(code: &str) -> Self {
        let normalized: String = code
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "tokenexpired" | "expiredtoken" | "jwtexpired" => AuthErrorCode::TokenExpired,
            "invalidtoken" | "tokeninvalid" | "jwtinvalid" => AuthErrorCode::InvalidToken,
            _ => AuthErrorCode::Other(code.to_string()),
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthErrorCode::TokenExpired => f.write_str("TOKEN_EXPIRED"),
            AuthErrorCode::InvalidToken => f.write_str("INVALID_TOKEN"),
            AuthErrorCode::Other(code) => f.write_str(code),
        }
    }
}

/// A non-success response from the backend.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Backend error code (if present).
    pub code: Option<AuthErrorCode>,
    /// Error message from the backend.
    pub message: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, code: Option<AuthErrorCode>, message: Option<String>) -> Self {
        Self {
            status,
            code,
            message,
        }
    }

    /// Check if this is an authentication failure.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// A header name or value could not be encoded.
    #[error("invalid header '{name}': {reason}")]
    Header { name: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Token store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("I/O error: {message}")]
    Io { message: String },

    /// The stored data could not be parsed.
    #[error("corrupt session data: {message}")]
    Corrupt { message: String },
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_expired_codes() {
        assert_eq!(AuthErrorCode::parse("TOKEN_EXPIRED"), AuthErrorCode::TokenExpired);
        assert_eq!(AuthErrorCode::parse("token-expired"), AuthErrorCode::TokenExpired);
        assert_eq!(AuthErrorCode::parse("TokenExpired"), AuthErrorCode::TokenExpired);
    }

    #[test]
    fn parses_invalid_codes() {
        assert_eq!(AuthErrorCode::parse("INVALID_TOKEN"), AuthErrorCode::InvalidToken);
        assert_eq!(AuthErrorCode::parse("invalidToken"), AuthErrorCode::InvalidToken);
    }

    #[test]
    fn unknown_code_is_kept() {
        let code = AuthErrorCode::parse("FORBIDDEN_ROLE");
        assert_eq!(code, AuthErrorCode::Other("FORBIDDEN_ROLE".to_string()));
        assert_eq!(code.to_string(), "FORBIDDEN_ROLE");
    }

    #[test]
    fn api_error_display() {
        let err = ApiError::new(
            401,
            Some(AuthErrorCode::TokenExpired),
            Some("jwt expired".to_string()),
        );
        assert_eq!(err.to_string(), "HTTP 401 [TOKEN_EXPIRED]: jwt expired");
        assert!(err.is_unauthorized());

        let err = ApiError::new(500, None, None);
        assert_eq!(err.to_string(), "HTTP 500");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn unauthorized_display_keeps_backend_message() {
        let err = AuthError::Unauthorized(ApiError::new(
            401,
            Some(AuthErrorCode::InvalidToken),
            Some("token revoked".to_string()),
        ));
        assert_eq!(
            err.to_string(),
            "unauthorized: HTTP 401 [INVALID_TOKEN]: token revoked"
        );
        assert_eq!(
            AuthError::Unauthorized(ApiError::new(401, None, None)).to_string(),
            "unauthorized: HTTP 401"
        );
    }

    #[test]
    fn status_of_errors() {
        let err: Error = ApiError::new(403, None, None).into();
        assert_eq!(err.status(), Some(403));
        let err: Error = AuthError::Unauthorized(ApiError::new(401, None, None)).into();
        assert_eq!(err.status(), Some(401));
        let err: Error = AuthError::NotLoggedIn.into();
        assert_eq!(err.status(), None);
    }
}

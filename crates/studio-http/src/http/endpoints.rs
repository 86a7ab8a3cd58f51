//! Backend endpoint paths and wire types.

use serde::{Deserialize, Serialize};

use studio_core::TokenPair;

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Exchange credentials for a token pair.
pub const LOGIN: &str = "/api/auth/login";

/// Exchange a refresh token for a new token pair.
pub const REFRESH_TOKEN: &str = "/api/auth/refresh-token";

/// Public gallery.
pub const GALLERY: &str = "/api/gallery";

/// Admin photo management.
pub const ADMIN_PHOTOS: &str = "/api/admin/photos";

/// Approved testimonials shown on the public site.
pub const TESTIMONIALS_APPROVED: &str = "/api/testimonials/approved";

/// Every testimonial, approved or not (admin).
pub const TESTIMONIALS_ALL: &str = "/api/testimonials/all";

/// Public testimonial submission.
pub const TESTIMONIALS_SUBMIT: &str = "/api/testimonials/submit";

/// Path of a single admin photo.
pub fn admin_photo(id: &str) -> String {
    format!("{}/{}", ADMIN_PHOTOS, id)
}

/// Path that approves a testimonial.
pub fn approve_testimonial(id: &str) -> String {
    format!("/api/testimonials/{}/approve", id)
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for login.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Token pair as sent by the backend.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireTokens {
    pub access_token: String,
    /// Absent when the backend keeps the refresh token unchanged.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Login payload: `{ tokens, user }`.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginPayload {
    pub tokens: WireTokens,
    #[serde(default)]
    pub user: serde_json::Value,
}

/// Response from login, bare or wrapped in `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LoginResponse {
    Wrapped { data: LoginPayload },
    Direct(LoginPayload),
}

impl LoginResponse {
    pub fn into_payload(self) -> LoginPayload {
        match self {
            LoginResponse::Wrapped { data } => data,
            LoginResponse::Direct(payload) => payload,
        }
    }
}

/// Request body for refresh-token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Refresh payload, flat or nested under `tokens`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RefreshPayload {
    Nested { tokens: WireTokens },
    Flat(WireTokens),
}

/// Response from refresh-token, bare or wrapped in `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RefreshResponse {
    Wrapped { data: RefreshPayload },
    Direct(RefreshPayload),
}

impl RefreshResponse {
    /// Build the new pair, keeping `previous_refresh` if the backend did not rotate it.
    pub fn into_pair(self, previous_refresh: &str) -> TokenPair {
        let payload = match self {
            RefreshResponse::Wrapped { data } => data,
            RefreshResponse::Direct(payload) => payload,
        };
        let tokens = match payload {
            RefreshPayload::Nested { tokens } => tokens,
            RefreshPayload::Flat(tokens) => tokens,
        };
        let refresh = tokens
            .refresh_token
            .unwrap_or_else(|| previous_refresh.to_string());
        TokenPair::from_strings(tokens.access_token, refresh)
    }
}

/// Error body format: `{ code?, message?, error? }`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The most specific message in the body.
    pub fn message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.error.as_ref().and_then(|e| e.as_str()).map(String::from))
    }
}

/// A list response, bare or wrapped in an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(
            alias = "photos",
            alias = "testimonials",
            alias = "items",
            alias = "gallery"
        )]
        data: Vec<T>,
    },
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { data } => data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_response_direct_and_wrapped() {
        let body = json!({
            "tokens": {"accessToken": "A1", "refreshToken": "R1"},
            "user": {"id": "u1"}
        });
        let payload = serde_json::from_value::<LoginResponse>(body.clone())
            .unwrap()
            .into_payload();
        assert_eq!(payload.tokens.access_token, "A1");
        assert_eq!(payload.user["id"], "u1");

        let wrapped = json!({"success": true, "data": body});
        let payload = serde_json::from_value::<LoginResponse>(wrapped)
            .unwrap()
            .into_payload();
        assert_eq!(payload.tokens.refresh_token.as_deref(), Some("R1"));
    }

    #[test]
    fn refresh_response_shapes() {
        let flat = json!({"accessToken": "A2", "refreshToken": "R2"});
        let pair = serde_json::from_value::<RefreshResponse>(flat)
            .unwrap()
            .into_pair("R1");
        assert_eq!(pair, TokenPair::from_strings("A2", "R2"));

        let nested = json!({"data": {"tokens": {"accessToken": "A3", "refreshToken": "R3"}}});
        let pair = serde_json::from_value::<RefreshResponse>(nested)
            .unwrap()
            .into_pair("R2");
        assert_eq!(pair, TokenPair::from_strings("A3", "R3"));
    }

    #[test]
    fn refresh_without_rotation_keeps_previous() {
        let body = json!({"accessToken": "A2"});
        let pair = serde_json::from_value::<RefreshResponse>(body)
            .unwrap()
            .into_pair("R1");
        assert_eq!(pair.refresh().as_str(), "R1");
    }

    #[test]
    fn refresh_response_without_access_token_fails() {
        assert!(serde_json::from_value::<RefreshResponse>(json!({"ok": true})).is_err());
    }

    #[test]
    fn error_body_message_falls_back_to_error() {
        let body: ErrorBody =
            serde_json::from_value(json!({"code": "TOKEN_EXPIRED", "error": "jwt expired"}))
                .unwrap();
        assert_eq!(body.message().as_deref(), Some("jwt expired"));

        let body: ErrorBody = serde_json::from_value(json!({"error": {"nested": 1}})).unwrap();
        assert!(body.message().is_none());
    }

    #[test]
    fn list_envelope_shapes() {
        let bare: ListEnvelope<u32> = serde_json::from_value(json!([1, 2])).unwrap();
        assert_eq!(bare.into_vec(), vec![1, 2]);

        let wrapped: ListEnvelope<u32> =
            serde_json::from_value(json!({"photos": [3], "total": 1})).unwrap();
        assert_eq!(wrapped.into_vec(), vec![3]);
    }

    #[test]
    fn path_builders() {
        assert_eq!(admin_photo("p1"), "/api/admin/photos/p1");
        assert_eq!(approve_testimonial("t9"), "/api/testimonials/t9/approve");
    }
}

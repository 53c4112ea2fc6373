//! Platform identity header handling.
//!
//! # Trust Boundary
//! The `x-ms-client-principal` header is injected by the hosting platform's
//! authentication front door after the user has signed in. This gateway does
//! not verify it: there is no signature to check. Whatever sits in front of
//! the gateway MUST strip this header from client requests and set it only
//! for authenticated sessions. Deploying the gateway where clients can reach
//! it directly makes every gated route effectively public.
//!
//! # Behaviour
//! - Header missing or blank → 401, the handler never runs
//! - Header present but not a base64 JSON object → decode fault, generic 500
//! - `userDetails` missing → display name falls back to `"User"`

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use thiserror::Error;

/// Header carrying the base64-encoded client principal.
pub const PRINCIPAL_HEADER: &str = "x-ms-client-principal";

/// Display name used when the principal carries none.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Decoded identity claim. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityClaim {
    #[serde(rename = "userDetails", default, deserialize_with = "lenient_string")]
    user_details: Option<String>,

    #[serde(rename = "userId", default, deserialize_with = "lenient_string")]
    user_id: Option<String>,

    #[serde(rename = "identityProvider", default, deserialize_with = "lenient_string")]
    identity_provider: Option<String>,
}

impl IdentityClaim {
    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        self.user_details.as_deref().unwrap_or(DEFAULT_DISPLAY_NAME)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn identity_provider(&self) -> Option<&str> {
        self.identity_provider.as_deref()
    }
}

// Non-string values are treated as absent rather than failing the decode.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

/// Reasons the identity gate rejects a request.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity header x-ms-client-principal is missing")]
    Missing,

    #[error("identity header is not valid text")]
    NotText,

    #[error("identity header is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("identity header is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("identity claim is not a JSON object")]
    NotObject,
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        match self {
            IdentityError::Missing => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized. Please sign in via Azure Entra ID.",
            )
                .into_response(),
            other => {
                tracing::error!(error = %other, "Failed to decode client principal");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

/// Decode a raw header value into a claim.
pub fn decode_principal(raw: &[u8]) -> Result<IdentityClaim, IdentityError> {
    let json = STANDARD.decode(raw.trim_ascii())?;
    match serde_json::from_slice(&json)? {
        value @ serde_json::Value::Object(_) => Ok(serde_json::from_value(value)?),
        _ => Err(IdentityError::NotObject),
    }
}

/// Look up and decode the principal header.
pub fn identity_from_headers(headers: &HeaderMap) -> Result<IdentityClaim, IdentityError> {
    let value = headers.get(PRINCIPAL_HEADER).ok_or(IdentityError::Missing)?;
    if value.as_bytes().trim_ascii().is_empty() {
        return Err(IdentityError::Missing);
    }
    if value.to_str().is_err() {
        return Err(IdentityError::NotText);
    }
    decode_principal(value.as_bytes())
}

/// Extractor that gates a handler on the identity header.
#[derive(Debug, Clone)]
pub struct Principal(pub IdentityClaim);

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = IdentityError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_headers(&parts.headers).map(Principal)
    }
}

/// Encode a display name the way the platform does. Used by the CLI and tests.
pub fn encode_principal(user_details: &str) -> String {
    let claim = serde_json::json!({
        "identityProvider": "aad",
        "userDetails": user_details,
        "userRoles": ["anonymous", "authenticated"],
    });
    STANDARD.encode(claim.to_string())
}

//! Axum extractors and request decoding helpers
//!
//! [`AuthContext`] can be taken directly as a handler argument: it reads the
//! `Authorization` header, verifies the token and rejects with a
//! [`ShelfError`] when anything is wrong. Role checks are left to the
//! handler so that authorization always runs before the body is parsed.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use serde::de::DeserializeOwned;

use crate::core::auth::AuthContext;
use crate::core::error::ShelfError;
use crate::core::token::{TokenError, TokenService};

const BEARER_SCHEME: &str = "Bearer";

/// Read the raw token from the `Authorization` header
///
/// The header carries the token itself; a `Bearer` scheme word is accepted
/// and stripped. An absent or blank header, or a bare `Bearer`, is
/// [`TokenError::Missing`].
pub fn extract_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Err(TokenError::Missing);
    };

    let raw = value
        .to_str()
        .map_err(|e| TokenError::Malformed(e.to_string()))?
        .trim();
    let token = match raw.strip_prefix(BEARER_SCHEME) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => raw,
    };

    if token.is_empty() {
        Err(TokenError::Missing)
    } else {
        Ok(token)
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ShelfError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = TokenService::from_ref(state);
        extract_token(&parts.headers)
            .and_then(|token| tokens.verify(token))
            .map_err(|reason| {
                tracing::debug!(%reason, path = %parts.uri.path(), "token rejected");
                ShelfError::from(reason)
            })
    }
}

/// Decode a JSON request body
///
/// Used instead of axum's `Json` extractor so that decoding happens after
/// the policy check and every decode failure is a plain `400`.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ShelfError> {
    Ok(serde_json::from_slice(body)?)
}

//! Stateless signed tokens
//!
//! Tokens are HS256 JWTs carrying `username`, `role`, `iat` and `exp`.
//! Nothing is stored server-side: a token stays valid until `exp` passes.

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::auth::{AuthContext, Role};

/// Default token lifetime
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Why a token was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("no token presented")]
    Missing,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token claims are invalid: {0}")]
    InvalidClaims(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::MissingRequiredClaim(_) => TokenError::InvalidClaims(err.to_string()),
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// Claims embedded in every issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub role: String,
    /// Issued at (unix seconds), absent on tokens from older issuers
    #[serde(default)]
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Claims issued now and expiring after `ttl`
    ///
    /// Fails with [`TokenError::Signing`] when the expiry is not a
    /// representable timestamp.
    pub fn new(username: impl Into<String>, role: Role, ttl: Duration) -> Result<Self, TokenError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing(format!("token lifetime {} overflows", ttl)))?;
        Ok(Self {
            username: username.into(),
            role: role.as_str().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }

    /// Role parsed into the closed enum
    pub fn role(&self) -> Role {
        Role::from_claim(&self.role)
    }
}

/// Issues and verifies tokens with a single process-wide secret
#[derive(Clone)]
pub struct TokenService {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service signing with `secret`
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret)),
            decoding_key: Arc::new(DecodingKey::from_secret(secret)),
            validation: Arc::new(validation),
            ttl,
        }
    }

    /// Create a token service with the default 24h lifetime
    pub fn with_secret(secret: &[u8]) -> Self {
        Self::new(secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `username` with `role`, expiring after the TTL
    pub fn issue(&self, username: &str, role: Role) -> Result<String, TokenError> {
        let claims = Claims::new(username, role, self.ttl)?;
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature and expiry, returning the decoded claims
    ///
    /// The payload is first decoded as untyped JSON, so a claim-shape
    /// failure is only ever reported for a token whose signature checked out.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Missing);
        }
        let data = decode::<Value>(token, &self.decoding_key, &self.validation)?;
        serde_json::from_value(data.claims).map_err(|e| TokenError::InvalidClaims(e.to_string()))
    }

    /// Verify a token and return the caller's identity
    pub fn verify(&self, token: &str) -> Result<AuthContext, TokenError> {
        let claims = self.decode(token)?;
        let role = claims.role();
        Ok(AuthContext::new(claims.username, role))
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

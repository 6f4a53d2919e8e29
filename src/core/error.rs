//! Typed error handling for shelf-rs
//!
//! Every failure a request can hit is represented by a variant of
//! [`ShelfError`]. Each category knows its HTTP status and a stable error
//! code; the response body is the plain-text `Display` form.
//!
//! # Error Categories
//!
//! - [`RequestError`]: the request itself could not be understood
//! - [`AuthError`]: credentials, tokens and role checks
//! - [`ValidationError`]: well-formed input that breaks a domain rule
//! - [`StorageError`]: the content store could not be accessed
//!
//! Forbidden requests deliberately share `401 Unauthorized` with
//! unauthenticated ones; clients of this service expect a single status for
//! "you may not do this".

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

use crate::core::token::TokenError;

/// The main error type for shelf-rs
#[derive(Debug)]
pub enum ShelfError {
    /// Malformed request (bad JSON, missing parameter)
    Request(RequestError),

    /// Authentication or authorization failure
    Auth(AuthError),

    /// Domain validation failure
    Validation(ValidationError),

    /// Content store failure
    Storage(StorageError),

    /// Internal errors (token signing, configuration)
    Internal(String),
}

impl fmt::Display for ShelfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShelfError::Request(e) => write!(f, "{}", e),
            ShelfError::Auth(e) => write!(f, "{}", e),
            ShelfError::Validation(e) => write!(f, "{}", e),
            ShelfError::Storage(e) => write!(f, "{}", e),
            ShelfError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ShelfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShelfError::Request(e) => Some(e),
            ShelfError::Auth(e) => Some(e),
            ShelfError::Validation(e) => Some(e),
            ShelfError::Storage(e) => Some(e),
            ShelfError::Internal(_) => None,
        }
    }
}

impl ShelfError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShelfError::Request(e) => e.status_code(),
            ShelfError::Auth(_) => StatusCode::UNAUTHORIZED,
            ShelfError::Validation(_) => StatusCode::BAD_REQUEST,
            ShelfError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShelfError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShelfError::Request(e) => e.error_code(),
            ShelfError::Auth(e) => e.error_code(),
            ShelfError::Validation(_) => "VALIDATION_ERROR",
            ShelfError::Storage(_) => "STORAGE_ERROR",
            ShelfError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ShelfError::Internal(message.into())
    }
}

impl IntoResponse for ShelfError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }
        (status, self.to_string()).into_response()
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors caused by a request that cannot be decoded
#[derive(Debug)]
pub enum RequestError {
    /// Body is not valid JSON for the expected shape
    MalformedBody { message: String },

    /// Required query parameter is absent or empty
    MissingParameter { parameter: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::MalformedBody { message } => write!(f, "{}", message),
            RequestError::MissingParameter { parameter } => {
                write!(f, "Missing book {} parameter", parameter)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::MalformedBody { .. } => "MALFORMED_BODY",
            RequestError::MissingParameter { .. } => "MISSING_PARAMETER",
        }
    }
}

impl From<RequestError> for ShelfError {
    fn from(err: RequestError) -> Self {
        ShelfError::Request(err)
    }
}

impl From<serde_json::Error> for ShelfError {
    fn from(err: serde_json::Error) -> Self {
        ShelfError::Request(RequestError::MalformedBody {
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Errors related to authentication and authorization
#[derive(Debug)]
pub enum AuthError {
    /// Username/password pair is not registered
    InvalidCredentials,

    /// Token missing, unverifiable, expired or carrying bad claims
    Token(TokenError),

    /// Valid token, but the role may not perform the action
    Forbidden { action: String },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Invalid username or password"),
            AuthError::Token(TokenError::Missing) => write!(f, "Missing authorization token"),
            AuthError::Token(TokenError::InvalidClaims(_)) => write!(f, "Invalid token claims"),
            AuthError::Token(_) => write!(f, "Invalid token"),
            AuthError::Forbidden { .. } => write!(f, "Unauthorized"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Token(e) => Some(e),
            _ => None,
        }
    }
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Token(TokenError::Missing) => "MISSING_TOKEN",
            AuthError::Token(TokenError::Expired) => "EXPIRED_TOKEN",
            AuthError::Token(TokenError::InvalidClaims(_)) => "INVALID_CLAIMS",
            AuthError::Token(_) => "INVALID_TOKEN",
            AuthError::Forbidden { .. } => "FORBIDDEN",
        }
    }
}

impl From<AuthError> for ShelfError {
    fn from(err: AuthError) -> Self {
        ShelfError::Auth(err)
    }
}

impl From<TokenError> for ShelfError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(message) => ShelfError::Internal(message),
            other => ShelfError::Auth(AuthError::Token(other)),
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to domain validation of input
#[derive(Debug)]
pub enum ValidationError {
    /// A book failed its creation invariant
    InvalidBook(Vec<FieldValidationError>),
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidBook(_) => write!(f, "Invalid book data"),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    /// Per-field failures, for logs
    pub fn fields(&self) -> &[FieldValidationError] {
        match self {
            ValidationError::InvalidBook(fields) => fields,
        }
    }
}

impl From<ValidationError> for ShelfError {
    fn from(err: ValidationError) -> Self {
        ShelfError::Validation(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the content store
#[derive(Debug)]
pub enum StorageError {
    /// A writer panicked while holding the store lock
    LockPoisoned { operation: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::LockPoisoned { operation } => {
                write!(f, "Content store unavailable during {}", operation)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for ShelfError {
    fn from(err: StorageError) -> Self {
        ShelfError::Storage(err)
    }
}

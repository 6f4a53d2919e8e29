//! Core module containing the domain types, policy and service traits

pub mod auth;
pub mod book;
pub mod error;
pub mod extractors;
pub mod service;
pub mod token;
pub mod validation;

pub use auth::{AccessPolicy, Action, AuthContext, Role};
pub use book::{Book, Partition};
pub use error::{AuthError, RequestError, ShelfError, StorageError, ValidationError};
pub use service::{ContentStore, CredentialStore, RemoveOutcome};
pub use token::{Claims, TokenError, TokenService};

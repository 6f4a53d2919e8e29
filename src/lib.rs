//! # shelf-rs
//!
//! A small HTTP service that hands out signed tokens at login and uses them
//! to gate access to an in-memory book shelf.
//!
//! ## Features
//!
//! - **Stateless tokens**: HS256 JWTs carrying username, role and expiry
//! - **Role-based visibility**: admins see the privileged partition, regular users do not
//! - **Admin-only mutations**: add and delete always target the base partition
//! - **Explicit stores**: credentials and content are plain objects passed into the router
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shelf::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_config(ShelfConfig::load()?)
//!         .serve()
//!         .await
//! }
//! ```

pub mod books;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AccessPolicy, Action, AuthContext, Role},
        book::{Book, Partition},
        error::{AuthError, RequestError, ShelfError, StorageError, ValidationError},
        service::{ContentStore, CredentialStore, RemoveOutcome},
        token::{Claims, TokenError, TokenService},
    };

    // === Handlers ===
    pub use crate::books::{AppState, LoginRequest, LoginResponse};

    // === Storage ===
    pub use crate::storage::{InMemoryContentStore, InMemoryCredentialStore};

    // === Config ===
    pub use crate::config::{AuthConfig, BooksConfig, ServerConfig, ShelfConfig, UserConfig};

    // === Server ===
    pub use crate::server::{ServerBuilder, build_routes};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}

//! Roles, authorization context and access policy
//!
//! The policy is a pure function of the verified role:
//! - `regular`: may list the base partition only
//! - `admin`: may list both partitions, add books and delete books
//!
//! Mutations only ever touch [`AccessPolicy::MUTATION_PARTITION`]. Admins
//! can read the privileged partition but cannot add to it or remove from it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::book::Partition;
use crate::core::error::AuthError;

/// Closed set of roles understood by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Regular,
}

impl Role {
    /// Parse a role claim
    ///
    /// Only `"admin"` is privileged; every other value is read as
    /// [`Role::Regular`].
    pub fn from_claim(claim: &str) -> Self {
        if claim == "admin" {
            Role::Admin
        } else {
            Role::Regular
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Regular => "regular",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorization context extracted from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub username: String,
    pub role: Role,
}

impl AuthContext {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}

/// Operations a caller can request against the shelf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListBooks,
    AddBook,
    DeleteBook,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::ListBooks => write!(f, "list books"),
            Action::AddBook => write!(f, "add book"),
            Action::DeleteBook => write!(f, "delete book"),
        }
    }
}

const ALL_PARTITIONS: &[Partition] = &[Partition::Base, Partition::Privileged];
const BASE_ONLY: &[Partition] = &[Partition::Base];

/// Role-based access policy
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
    /// Partition every add and delete operates on, regardless of role
    pub const MUTATION_PARTITION: Partition = Partition::Base;

    /// Partitions a role may read, in listing order
    pub fn visible_partitions(role: Role) -> &'static [Partition] {
        match role {
            Role::Admin => ALL_PARTITIONS,
            Role::Regular => BASE_ONLY,
        }
    }

    /// Check if a role may perform an action
    pub fn is_allowed(role: Role, action: Action) -> bool {
        match action {
            Action::ListBooks => true,
            Action::AddBook | Action::DeleteBook => role.is_admin(),
        }
    }

    /// Same as [`is_allowed`](Self::is_allowed), as a `Result` for handlers
    pub fn authorize(context: &AuthContext, action: Action) -> Result<(), AuthError> {
        if Self::is_allowed(context.role, action) {
            Ok(())
        } else {
            tracing::debug!(
                username = %context.username,
                role = %context.role,
                %action,
                "action denied by policy"
            );
            Err(AuthError::Forbidden {
                action: action.to_string(),
            })
        }
    }
}

//! Service traits for credentials and shelf content
//!
//! Handlers only talk to these traits; the in-memory implementations live
//! in [`crate::storage`].

use async_trait::async_trait;

use crate::core::auth::{AccessPolicy, Role};
use crate::core::book::{Book, Partition};
use crate::core::error::ShelfError;

/// Registry of known users
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up the role registered for an exact username/password pair
    ///
    /// Returns `None` when no entry matches both fields.
    async fn authenticate(&self, username: &str, password: &str) -> Option<Role>;
}

/// Outcome of a remove-by-name call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The first matching book was removed
    Removed(Book),
    /// No book matched; the store is unchanged
    NotFound,
}

impl RemoveOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, RemoveOutcome::Removed(_))
    }
}

/// Partitioned book storage
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Snapshot of the given partitions, concatenated in order
    async fn list(&self, partitions: &[Partition]) -> Result<Vec<Book>, ShelfError>;

    /// Validate and append a book to the mutation partition
    async fn add(&self, book: Book) -> Result<(), ShelfError>;

    /// Remove the first book in the mutation partition whose name matches
    /// case-insensitively
    async fn remove(&self, name: &str) -> Result<RemoveOutcome, ShelfError>;

    /// Number of books held in a partition
    async fn len(&self, partition: Partition) -> Result<usize, ShelfError>;

    /// Books visible to `role`
    async fn list_visible(&self, role: Role) -> Result<Vec<Book>, ShelfError> {
        self.list(AccessPolicy::visible_partitions(role)).await
    }
}

//! In-memory implementation of ContentStore
//!
//! Both partitions sit behind a single `RwLock`, so a listing never
//! observes a half-applied add or remove.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::config::BooksConfig;
use crate::core::error::{ShelfError, StorageError};
use crate::core::service::{ContentStore, RemoveOutcome};
use crate::core::{AccessPolicy, Book, Partition};

#[derive(Debug, Default)]
struct Shelves {
    base: Vec<Book>,
    privileged: Vec<Book>,
}

impl Shelves {
    fn partition(&self, partition: Partition) -> &Vec<Book> {
        match partition {
            Partition::Base => &self.base,
            Partition::Privileged => &self.privileged,
        }
    }

    fn partition_mut(&mut self, partition: Partition) -> &mut Vec<Book> {
        match partition {
            Partition::Base => &mut self.base,
            Partition::Privileged => &mut self.privileged,
        }
    }
}

/// In-memory content store
///
/// Cloning is cheap and every clone shares the same shelves.
#[derive(Clone, Default)]
pub struct InMemoryContentStore {
    shelves: Arc<RwLock<Shelves>>,
}

impl InMemoryContentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with both partitions
    pub fn with_books(base: Vec<Book>, privileged: Vec<Book>) -> Self {
        Self {
            shelves: Arc::new(RwLock::new(Shelves { base, privileged })),
        }
    }

    /// Create a store from configured seed data
    pub fn from_config(books: &BooksConfig) -> Self {
        Self::with_books(books.base.clone(), books.privileged.clone())
    }
}

fn poisoned(operation: &str) -> ShelfError {
    StorageError::LockPoisoned {
        operation: operation.to_string(),
    }
    .into()
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn list(&self, partitions: &[Partition]) -> Result<Vec<Book>, ShelfError> {
        let shelves = self.shelves.read().map_err(|_| poisoned("list"))?;

        Ok(partitions
            .iter()
            .flat_map(|p| shelves.partition(*p).iter().cloned())
            .collect())
    }

    async fn add(&self, book: Book) -> Result<(), ShelfError> {
        if let Err(err) = book.validate() {
            tracing::debug!(fields = ?err.fields(), "rejected book");
            return Err(err.into());
        }

        let mut shelves = self.shelves.write().map_err(|_| poisoned("add"))?;
        shelves
            .partition_mut(AccessPolicy::MUTATION_PARTITION)
            .push(book);

        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<RemoveOutcome, ShelfError> {
        let mut shelves = self.shelves.write().map_err(|_| poisoned("remove"))?;
        let books = shelves.partition_mut(AccessPolicy::MUTATION_PARTITION);

        match books.iter().position(|b| b.name_matches(name)) {
            Some(index) => Ok(RemoveOutcome::Removed(books.remove(index))),
            None => Ok(RemoveOutcome::NotFound),
        }
    }

    async fn len(&self, partition: Partition) -> Result<usize, ShelfError> {
        let shelves = self.shelves.read().map_err(|_| poisoned("len"))?;
        Ok(shelves.partition(partition).len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Role;
    use crate::core::error::ValidationError;

    fn seeded() -> InMemoryContentStore {
        InMemoryContentStore::from_config(&BooksConfig::default())
    }

    fn names(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_admin_lists_base_then_privileged() {
        let store = seeded();
        let books = store.list_visible(Role::Admin).await.unwrap();
        assert_eq!(names(&books), vec!["Book 1", "Book 2", "Book 3", "Book 4"]);
    }

    #[tokio::test]
    async fn test_regular_lists_base_only() {
        let store = seeded();
        let books = store.list_visible(Role::Regular).await.unwrap();
        assert_eq!(names(&books), vec!["Book 1", "Book 2"]);
    }

    #[tokio::test]
    async fn test_regular_is_prefix_of_admin() {
        let store = seeded();
        store.add(Book::new("Book 5", "Author 5", 2021)).await.unwrap();
        let regular = store.list_visible(Role::Regular).await.unwrap();
        let admin = store.list_visible(Role::Admin).await.unwrap();
        assert!(admin.starts_with(&regular));
    }

    #[tokio::test]
    async fn test_listing_is_a_snapshot() {
        let store = seeded();
        let mut snapshot = store.list_visible(Role::Admin).await.unwrap();
        snapshot.clear();
        assert_eq!(store.list_visible(Role::Admin).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_add_appends_to_base() {
        let store = seeded();
        store.add(Book::new("Book 5", "Author 5", 2021)).await.unwrap();

        assert_eq!(store.len(Partition::Base).await.unwrap(), 3);
        assert_eq!(store.len(Partition::Privileged).await.unwrap(), 2);
        let base = store.list(&[Partition::Base]).await.unwrap();
        assert_eq!(base.last().unwrap().name, "Book 5");
    }

    #[tokio::test]
    async fn test_add_allows_duplicate_names() {
        let store = seeded();
        store.add(Book::new("Book 1", "Someone else", 1999)).await.unwrap();
        assert_eq!(store.len(Partition::Base).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_invalid_add_leaves_store_unchanged() {
        let store = seeded();
        for bad in [
            Book::new("", "Author", 2000),
            Book::new("Name", "", 2000),
            Book::new("Name", "Author", 0),
        ] {
            let err = store.add(bad).await.unwrap_err();
            assert!(matches!(
                err,
                ShelfError::Validation(ValidationError::InvalidBook(_))
            ));
        }
        assert_eq!(store.list_visible(Role::Admin).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_remove_is_case_insensitive() {
        let store = seeded();
        let outcome = store.remove("bOOk 1").await.unwrap();
        assert_eq!(
            outcome,
            RemoveOutcome::Removed(Book::new("Book 1", "Author 1", 2020))
        );
        let books = store.list_visible(Role::Admin).await.unwrap();
        assert!(books.iter().all(|b| !b.name_matches("book 1")));
    }

    #[tokio::test]
    async fn test_remove_missing_leaves_store_unchanged() {
        let store = seeded();
        let outcome = store.remove("Book 99").await.unwrap();
        assert_eq!(outcome, RemoveOutcome::NotFound);
        assert_eq!(store.list_visible(Role::Admin).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_remove_never_touches_privileged() {
        let store = seeded();
        assert_eq!(store.remove("Book 3").await.unwrap(), RemoveOutcome::NotFound);
        assert_eq!(store.len(Partition::Privileged).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_remove_takes_first_duplicate_only() {
        let store = InMemoryContentStore::with_books(
            vec![
                Book::new("Twin", "First", 1),
                Book::new("twin", "Second", 2),
            ],
            vec![],
        );
        store.remove("TWIN").await.unwrap();
        let left = store.list(&[Partition::Base]).await.unwrap();
        assert_eq!(left, vec![Book::new("twin", "Second", 2)]);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemoryContentStore::new();
        let clone = store.clone();
        clone.add(Book::new("Shared", "Author", 2001)).await.unwrap();
        assert_eq!(store.len(Partition::Base).await.unwrap(), 1);
    }
}

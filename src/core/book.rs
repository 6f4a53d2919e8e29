//! Book model and content partitions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{FieldValidationError, ValidationError};
use crate::core::validation::validators::{non_empty, non_zero};

/// A single unit of shelf content
///
/// Names are not unique: two books may share a name, and lookups by name
/// compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default, alias = "Name")]
    pub name: String,

    #[serde(default, alias = "Author")]
    pub author: String,

    #[serde(default, alias = "PublicationYear")]
    pub publication_year: i64,
}

impl Book {
    /// Create a new book
    pub fn new(name: impl Into<String>, author: impl Into<String>, publication_year: i64) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            publication_year,
        }
    }

    /// Check the creation invariant: non-empty name and author, year ≠ 0
    ///
    /// Every failing field is reported, not only the first one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let errors: Vec<FieldValidationError> = [
            non_empty("name", &self.name),
            non_empty("author", &self.author),
            non_zero("publicationYear", self.publication_year),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::InvalidBook(errors))
        }
    }

    /// Case-insensitive name comparison
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// One of the two disjoint collections held by a content store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    /// Visible to every authenticated role
    Base,
    /// Visible to admins only
    Privileged,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partition::Base => write!(f, "base"),
            Partition::Privileged => write!(f, "privileged"),
        }
    }
}

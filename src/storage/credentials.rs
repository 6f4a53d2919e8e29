//! In-memory implementation of CredentialStore

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::UserConfig;
use crate::core::Role;
use crate::core::service::CredentialStore;

/// Fixed registry of users, built once at startup
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    users: Arc<Vec<UserConfig>>,
}

impl InMemoryCredentialStore {
    pub fn new(users: Vec<UserConfig>) -> Self {
        Self {
            users: Arc::new(users),
        }
    }

    pub fn from_config(users: &[UserConfig]) -> Self {
        Self::new(users.to_vec())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn authenticate(&self, username: &str, password: &str) -> Option<Role> {
        self.users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .map(|u| u.role)
    }
}

//! In-memory user directory.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::UserDirectory;

/// Email to user map, keyed by lowercased email.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, UserId>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user under `email`, replacing any previous owner.
    pub async fn insert(&self, email: &str, user_id: UserId) {
        self.users
            .write()
            .await
            .insert(email.trim().to_lowercase(), user_id);
    }

    /// Builder-style registration for test setup.
    pub fn with_user(mut self, email: &str, user_id: UserId) -> Self {
        self.users
            .get_mut()
            .insert(email.trim().to_lowercase(), user_id);
        self
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserId>, DomainError> {
        let key = email.trim().to_lowercase();
        Ok(self.users.read().await.get(&key).cloned())
    }
}

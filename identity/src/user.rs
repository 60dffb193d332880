use crate::error::DirectoryError;
use crate::scope::ScopeSet;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// A registered user: the hash of their password and the scopes granted to
/// tokens issued on their behalf. The plaintext password is never stored.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub password_hash: String,
    pub scopes: ScopeSet,
}

/// Lookup of user registrations by username.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns the record for `username`, or `None` when the name is unknown.
    async fn get_user_info(&self, username: &str) -> Result<Option<UserRecord>, DirectoryError>;
}

/// In-memory user directory. Unlike the client directory, users are also
/// registered at runtime through the user-creation operation.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, username: impl Into<String>, record: UserRecord) {
        self.users
            .write()
            .expect("user directory lock poisoned")
            .insert(username.into(), record);
    }

    /// All registered usernames, sorted for a stable listing order.
    pub fn usernames(&self) -> Vec<String> {
        let users = self.users.read().expect("user directory lock poisoned");
        let mut names: Vec<String> = users.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get_user_info(&self, username: &str) -> Result<Option<UserRecord>, DirectoryError> {
        let users = self.users.read().expect("user directory lock poisoned");
        Ok(users.get(username).cloned())
    }
}

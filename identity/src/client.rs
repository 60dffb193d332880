use crate::error::DirectoryError;
use crate::scope::ScopeSet;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// A registered client application: its shared secret and the scope set fixed
/// at registration time.
#[derive(Debug, Clone)]
pub struct ClientRecord {
    pub secret: String,
    pub scopes: ScopeSet,
}

/// Lookup of client registrations by client id.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Returns the registration for `client_id`, or `None` when the id is
    /// unknown. Backend failures are errors, not absence.
    async fn get_client_info(&self, client_id: &str)
        -> Result<Option<ClientRecord>, DirectoryError>;
}

/// In-memory client directory, seeded at startup.
#[derive(Debug, Default)]
pub struct InMemoryClientDirectory {
    clients: RwLock<HashMap<String, ClientRecord>>,
}

impl InMemoryClientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, client_id: impl Into<String>, record: ClientRecord) {
        self.clients
            .write()
            .expect("client directory lock poisoned")
            .insert(client_id.into(), record);
    }
}

#[async_trait]
impl ClientDirectory for InMemoryClientDirectory {
    async fn get_client_info(
        &self,
        client_id: &str,
    ) -> Result<Option<ClientRecord>, DirectoryError> {
        let clients = self.clients.read().expect("client directory lock poisoned");
        Ok(clients.get(client_id).cloned())
    }
}

use super::AccessToken;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Indexes {
    by_access: HashMap<String, Arc<AccessToken>>,
    by_refresh: HashMap<String, Arc<AccessToken>>,
}

/// Authoritative in-memory registry of issued tokens, indexed by access value
/// and, where present, refresh value.
///
/// Lookups used for authentication treat expired tokens as absent; the record
/// itself stays in the store until revoked, so expiry state remains
/// inspectable.
#[derive(Debug, Default)]
pub struct TokenStore {
    inner: RwLock<Indexes>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a token under its access value and, when present, its refresh
    /// value. Re-inserting an existing key overwrites the previous record.
    pub fn insert(&self, token: AccessToken) -> Arc<AccessToken> {
        let token = Arc::new(token);
        let mut inner = self.inner.write().expect("token store lock poisoned");
        inner
            .by_access
            .insert(token.access.clone(), Arc::clone(&token));
        if let Some(refresh) = &token.refresh {
            inner.by_refresh.insert(refresh.clone(), Arc::clone(&token));
        }
        token
    }

    /// Resolve an access value to a live token. Expired tokens are absent.
    pub fn lookup_by_access(&self, access: &str) -> Option<Arc<AccessToken>> {
        self.get(access).filter(|token| !token.is_expired())
    }

    /// Resolve a refresh value to a live token. Expired tokens are absent.
    pub fn lookup_by_refresh(&self, refresh: &str) -> Option<Arc<AccessToken>> {
        let inner = self.inner.read().expect("token store lock poisoned");
        inner
            .by_refresh
            .get(refresh)
            .filter(|token| !token.is_expired())
            .cloned()
    }

    /// The stored record for an access value, regardless of expiry.
    pub fn get(&self, access: &str) -> Option<Arc<AccessToken>> {
        let inner = self.inner.read().expect("token store lock poisoned");
        inner.by_access.get(access).cloned()
    }

    /// Remove a token from both indexes. Returns whether a record existed.
    pub fn revoke(&self, access: &str) -> bool {
        let mut inner = self.inner.write().expect("token store lock poisoned");
        match inner.by_access.remove(access) {
            Some(token) => {
                if let Some(refresh) = &token.refresh {
                    inner.by_refresh.remove(refresh);
                }
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .expect("token store lock poisoned")
            .by_access
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::token_with;
    use super::*;
    use chrono::{Duration, Utc};
    use identity::ScopeSet;

    #[test]
    fn insert_indexes_both_values() {
        let store = TokenStore::new();
        let mut token = token_with(ScopeSet::new(), Utc::now() + Duration::seconds(60));
        token.refresh = Some("refresh-value".to_string());
        let access = token.access.clone();
        store.insert(token);

        assert!(store.lookup_by_access(&access).is_some());
        let via_refresh = store.lookup_by_refresh("refresh-value").unwrap();
        assert_eq!(via_refresh.access, access);
    }

    #[test]
    fn expired_token_is_absent_from_lookup_but_still_stored() {
        let store = TokenStore::new();
        let token = token_with(ScopeSet::new(), Utc::now() - Duration::seconds(1));
        let access = token.access.clone();
        store.insert(token);

        assert!(store.lookup_by_access(&access).is_none());
        let record = store.get(&access).unwrap();
        assert!(record.is_expired());
    }

    #[test]
    fn revoke_removes_both_indexes() {
        let store = TokenStore::new();
        let mut token = token_with(ScopeSet::new(), Utc::now() + Duration::seconds(60));
        token.refresh = Some("refresh-value".to_string());
        let access = token.access.clone();
        store.insert(token);

        assert!(store.revoke(&access));
        assert!(store.get(&access).is_none());
        assert!(store.lookup_by_refresh("refresh-value").is_none());
        assert!(!store.revoke(&access));
    }

    #[test]
    fn reinsert_overwrites() {
        let store = TokenStore::new();
        let token = token_with(ScopeSet::new(), Utc::now() + Duration::seconds(60));
        let access = token.access.clone();
        store.insert(token.clone());

        let mut replacement = token;
        replacement.user_id = Some("amy".to_string());
        store.insert(replacement);

        assert_eq!(store.len(), 1);
        let stored = store.get(&access).unwrap();
        assert_eq!(stored.user_id.as_deref(), Some("amy"));
    }
}

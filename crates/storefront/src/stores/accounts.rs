//! Account directory storage.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use spicejar_core::Username;

use super::StoreError;

/// Credential storage for registered accounts.
///
/// Accounts are created on registration and never deleted. The stored
/// value is an argon2 password hash, never the password itself.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Store a credential for a new username.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the username already exists.
    async fn insert_new(&self, username: &Username, password_hash: &str) -> Result<(), StoreError>;

    /// Look up the password hash for a username, if registered.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    async fn password_hash(&self, username: &Username) -> Result<Option<String>, StoreError>;
}

/// Process-wide in-memory account directory.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<Username, String>>,
}

impl MemoryAccountStore {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert_new(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(username) {
            return Err(StoreError::Conflict(username.to_string()));
        }
        accounts.insert(username.clone(), password_hash.to_string());
        Ok(())
    }

    async fn password_hash(&self, username: &Username) -> Result<Option<String>, StoreError> {
        Ok(self.accounts.read().await.get(username).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let store = MemoryAccountStore::new();
        let name = Username::parse("priya").unwrap();

        assert!(store.password_hash(&name).await.unwrap().is_none());
        store.insert_new(&name, "hash-1").await.unwrap();
        assert_eq!(
            store.password_hash(&name).await.unwrap().as_deref(),
            Some("hash-1")
        );
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let store = MemoryAccountStore::new();
        let name = Username::parse("priya").unwrap();

        store.insert_new(&name, "hash-1").await.unwrap();
        let err = store.insert_new(&name, "hash-2").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // The original credential is untouched.
        assert_eq!(
            store.password_hash(&name).await.unwrap().as_deref(),
            Some("hash-1")
        );
    }
}

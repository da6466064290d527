//! Application state shared across handlers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::notify::{DisabledNotifier, Notifier, NotifyError, RelayNotifier};
use crate::services::{AuthService, OrderService};
use crate::stores::{
    AccountStore, JsonlRecordStore, MemoryAccountStore, RecordStore, StoreError,
};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("record store error: {0}")]
    Store(#[from] StoreError),
    #[error("notifier error: {0}")]
    Notify(#[from] NotifyError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog, stores, and services.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    auth: AuthService,
    orders: OrderService,
    records: Arc<dyn RecordStore>,
    cart_locks: SessionLocks,
}

impl AppState {
    /// Build the application state from configuration.
    ///
    /// Opens the record store under the configured data directory and
    /// wires the notification relay if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the
    /// relay client fails to build.
    pub async fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = Catalog::seed();
        let accounts: Arc<dyn AccountStore> = Arc::new(MemoryAccountStore::new());
        let records: Arc<dyn RecordStore> =
            Arc::new(JsonlRecordStore::open(&config.data_dir).await?);

        let notifier: Arc<dyn Notifier> = match &config.notify {
            Some(notify) => Arc::new(RelayNotifier::new(notify)?),
            None => Arc::new(DisabledNotifier),
        };

        let (sms_number, topic) = config
            .notify
            .as_ref()
            .map_or((None, None), |n| (n.sms_number.clone(), n.topic.clone()));

        let auth = AuthService::new(accounts);
        let orders = OrderService::new(Arc::clone(&records), notifier, sms_number, topic);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                auth,
                orders,
                records,
                cart_locks: SessionLocks::default(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the order workflow.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    /// Get a reference to the record store.
    #[must_use]
    pub fn records(&self) -> &Arc<dyn RecordStore> {
        &self.inner.records
    }

    /// Get the per-session lock registry.
    #[must_use]
    pub fn cart_locks(&self) -> &SessionLocks {
        &self.inner.cart_locks
    }
}

/// Per-session-id async locks.
///
/// Cart mutations are read-modify-write cycles against the session;
/// two concurrent requests for the same session id would otherwise lose
/// one of the updates. Handlers hold the session's lock across the
/// whole cycle. Entries are created on demand and live for the process
/// lifetime - bounded by the number of live sessions.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SessionLocks {
    /// Get (or create) the lock for a session id.
    ///
    /// # Panics
    ///
    /// Panics if the registry mutex is poisoned, which can only follow
    /// a panic on another request path.
    #[must_use]
    pub fn get(&self, session_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().expect("session lock registry poisoned");
        Arc::clone(locks.entry(session_id.to_string()).or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_locks_are_shared_per_id() {
        let locks = SessionLocks::default();
        let a = locks.get("session-1");
        let b = locks.get("session-1");
        let other = locks.get("session-2");

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[tokio::test]
    async fn test_session_lock_serializes() {
        let locks = SessionLocks::default();
        let lock = locks.get("session-1");

        let guard = lock.lock().await;
        assert!(locks.get("session-1").try_lock().is_err());
        drop(guard);
        assert!(locks.get("session-1").try_lock().is_ok());
    }
}

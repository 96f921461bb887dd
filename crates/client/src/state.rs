//! Application context shared across the client.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::auth::AuthSession;
use crate::compare::CompareList;
use crate::config::ClientConfig;
use crate::storage::{FileStore, KeyValueStore};

/// The client's long-lived state, built once at startup.
///
/// This struct is cheaply cloneable via `Arc`; every clone sees the same
/// comparison list, session and API client.
#[derive(Clone, Debug)]
pub struct AppContext {
    inner: Arc<AppContextInner>,
}

#[derive(Debug)]
struct AppContextInner {
    config: ClientConfig,
    compare: CompareList,
    auth: Arc<AuthSession>,
    api: ApiClient,
}

impl AppContext {
    /// Build the context over the file store named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let store = Arc::new(FileStore::new(&config.store_path));
        Self::with_store(config, store)
    }

    /// Build the context over an explicit store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built.
    pub fn with_store(config: ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let compare = CompareList::load(Arc::clone(&store));
        let auth = Arc::new(AuthSession::load(store));
        let api = ApiClient::new(&config.api, Arc::clone(&auth))?;

        Ok(Self {
            inner: Arc::new(AppContextInner {
                config,
                compare,
                auth,
                api,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the comparison list.
    #[must_use]
    pub fn compare(&self) -> &CompareList {
        &self.inner.compare
    }

    /// Get a reference to the authentication session.
    #[must_use]
    pub fn auth(&self) -> &AuthSession {
        &self.inner.auth
    }

    /// Get a reference to the REST API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Re-read comparison list and session from the store.
    pub fn reload(&self) {
        self.inner.compare.reload();
        self.inner.auth.reload();
    }
}

#[cfg(test)]
mod tests {
    use cohort_core::{ComparisonEntry, User};

    use super::*;
    use crate::storage::MemoryStore;

    fn config() -> ClientConfig {
        ClientConfig::from_lookup(|name| {
            (name == "COHORT_API_BASE_URL").then(|| "http://127.0.0.1:9".to_string())
        })
        .unwrap()
    }

    #[test]
    fn test_clones_share_state() {
        let ctx = AppContext::with_store(config(), Arc::new(MemoryStore::new())).unwrap();
        let other = ctx.clone();

        ctx.compare().add(ComparisonEntry::new("1", "A", "₹ 1 Cr"));
        other.auth().login("abc", User::new("u1", "555", "1")).unwrap();

        assert_eq!(other.compare().count(), 1);
        assert!(ctx.auth().is_authenticated());
    }

    #[test]
    fn test_reload_sees_store_changes() {
        let store = Arc::new(MemoryStore::new());
        let ctx = AppContext::with_store(config(), store.clone()).unwrap();
        let writer = AppContext::with_store(config(), store).unwrap();

        writer.compare().add(ComparisonEntry::new("1", "A", "₹ 1 Cr"));
        writer.auth().login("abc", User::new("u1", "555", "1")).unwrap();
        assert_eq!(ctx.compare().count(), 0);

        ctx.reload();
        assert_eq!(ctx.compare().count(), 1);
        assert!(ctx.auth().is_authenticated());
    }
}

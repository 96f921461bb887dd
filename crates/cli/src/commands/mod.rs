//! Subcommand implementations.

use std::sync::Arc;

use cohort_client::config::{ClientConfig, store_path_from_env};
use cohort_client::state::AppContext;
use cohort_client::storage::{FileStore, KeyValueStore};

use crate::error::CliError;

pub mod auth;
pub mod compare;
pub mod dashboard;
pub mod property;

pub use auth::AuthAction;
pub use compare::CompareAction;
pub use dashboard::DashboardAction;
pub use property::PropertyAction;

/// File store for commands that never reach the API.
fn local_store() -> Arc<dyn KeyValueStore> {
    let store = FileStore::new(store_path_from_env());
    tracing::debug!(path = %store.path().display(), "Using local store");
    Arc::new(store)
}

/// Full context for API-backed commands.
fn app_context() -> Result<AppContext, CliError> {
    let config = ClientConfig::from_env()?;
    Ok(AppContext::new(config)?)
}

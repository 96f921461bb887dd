//! Integration tests for the Cohort Homes client core.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cohort-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `compare_persistence` - comparison list across store instances
//! - `auth_session` - login, logout and notification behaviour over a file store
//! - `app_context` - the assembled context sharing one store
//!
//! No external services are needed. Every test works in its own temporary
//! directory.

use std::path::PathBuf;

use tempfile::TempDir;

/// A temporary directory holding one store file.
pub struct StoreDir {
    dir: TempDir,
}

impl StoreDir {
    /// Create a fresh temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Path of the store file inside the directory.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("store.json")
    }
}

impl Default for StoreDir {
    fn default() -> Self {
        Self::new()
    }
}

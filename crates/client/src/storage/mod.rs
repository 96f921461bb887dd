//! Persistent key-value bridge.
//!
//! Both state managers mirror their in-memory state through a
//! [`KeyValueStore`]. The contract is deliberately infallible: a store that
//! cannot read reports the key as absent, a store that cannot write drops
//! the value. Backends log what they drop; callers only ever see "present"
//! or "absent".
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local map
//! - [`FileStore`] - JSON object on disk, survives restarts
//! - [`UnavailableStore`] - a store that is switched off (private browsing,
//!   quota exhausted); reads nothing, keeps nothing

mod file;
mod memory;

pub use file::{FileStore, StoreError};
pub use memory::{MemoryStore, UnavailableStore};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Durable string-keyed storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str);

    /// Remove `key`. Removing an absent key is a no-op.
    fn delete(&self, key: &str);
}

/// Storage keys used by the client.
pub mod keys {
    /// JSON array of comparison entries.
    pub const COMPARE_LIST: &str = "compare_properties";

    /// Raw auth token string.
    pub const AUTH_TOKEN: &str = "auth_token";

    /// JSON user record.
    pub const AUTH_USER: &str = "auth_user";
}

/// Read and parse a JSON value.
///
/// Returns `None` when the key is absent or the stored text does not parse
/// as `T`; parse failures are logged so a corrupt store is visible in logs.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.read(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unparsable stored value");
            None
        }
    }
}

/// Serialize and write a JSON value.
///
/// # Errors
///
/// Returns the serialization error; nothing is written in that case.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), serde_json::Error> {
    let raw = serde_json::to_string(value)?;
    store.write(key, &raw);
    Ok(())
}

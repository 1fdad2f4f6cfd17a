//! Backing-store abstraction.
//!
//! The storefront originally persisted cart and token state into the
//! browser's local storage: a durable, synchronous, string-keyed store that
//! survives reloads within one profile. `KeyValueStore` models exactly that
//! contract; concrete implementations live in `bowtique-infrastructure`,
//! except for the in-memory fallback which is provided here so restricted
//! contexts (and tests) can run without any filesystem access.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::Result;

/// Fixed key under which the serialized cart snapshot is stored.
pub const CART_KEY: &str = "bowtique_cart_v1";

/// Fixed key under which the raw bearer token is mirrored.
pub const TOKEN_KEY: &str = "bowtique_token";

/// A durable, synchronous, string-keyed store.
///
/// Values are written whole on every set; there are no partial updates, so
/// disjoint keys never race within a single process.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, overwriting any prior value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the value stored under `key`; absent keys are a no-op.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store used when no durable location is available.
///
/// Nothing survives the process; this mirrors the original behaviour in
/// contexts where local storage was inaccessible.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

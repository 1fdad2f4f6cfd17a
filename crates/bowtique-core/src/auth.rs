//! Bearer token holder.
//!
//! Single source of truth for the credential sent on outbound requests. The
//! in-memory copy is authoritative; it is mirrored to the backing store so a
//! restart (or a freshly constructed holder in a new execution context) can
//! pick the token back up.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::storage::{KeyValueStore, TOKEN_KEY};

/// Holds the bearer credential in memory and mirrors it to the backing store.
///
/// `token` repopulates lazily from the store when memory is empty. Under a
/// single-context assumption this is sound; with several contexts sharing one
/// store (the multi-tab case) a concurrent writer can resurrect a token this
/// holder just cleared. Known skew, deliberately not resolved here.
pub struct TokenHolder {
    store: Arc<dyn KeyValueStore>,
    token: Mutex<Option<String>>,
}

impl TokenHolder {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            token: Mutex::new(None),
        }
    }

    /// Stores the token in memory and mirrors it to the backing store.
    /// Mirror failures are swallowed; the in-memory copy still wins.
    pub fn save_token(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
        if let Err(err) = self.store.set(TOKEN_KEY, token) {
            warn!(error = %err, "failed to mirror token to backing store");
        }
    }

    /// Returns the current token, lazily repopulating from the backing store
    /// when memory is empty. An inaccessible store yields `None`, never an
    /// error.
    pub fn token(&self) -> Option<String> {
        let mut guard = self.token.lock().unwrap();
        if guard.is_none() {
            match self.store.get(TOKEN_KEY) {
                Ok(stored) => *guard = stored,
                Err(err) => {
                    debug!(error = %err, "backing store inaccessible during token reload");
                }
            }
        }
        guard.clone()
    }

    /// Wipes both the memory and backing-store copies.
    pub fn clear_token(&self) {
        *self.token.lock().unwrap() = None;
        if let Err(err) = self.store.remove(TOKEN_KEY) {
            warn!(error = %err, "failed to remove token from backing store");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, Result};
    use crate::storage::MemoryStore;

    #[test]
    fn test_save_and_read_back() {
        let holder = TokenHolder::new(Arc::new(MemoryStore::new()));
        assert_eq!(holder.token(), None);

        holder.save_token("jwt-abc");
        assert_eq!(holder.token(), Some("jwt-abc".to_string()));
    }

    #[test]
    fn test_lazy_rehydration_from_store() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "jwt-persisted").unwrap();

        // Freshly constructed holder has empty memory and falls back to the
        // mirrored copy.
        let holder = TokenHolder::new(store);
        assert_eq!(holder.token(), Some("jwt-persisted".to_string()));
    }

    #[test]
    fn test_clear_wipes_memory_and_store() {
        let store = Arc::new(MemoryStore::new());
        let holder = TokenHolder::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);
        holder.save_token("jwt-abc");

        holder.clear_token();
        assert_eq!(holder.token(), None);
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_inaccessible_store_yields_none() {
        struct BrokenStore;

        impl KeyValueStore for BrokenStore {
            fn get(&self, _key: &str) -> Result<Option<String>> {
                Err(CoreError::storage("restricted context"))
            }
            fn set(&self, _key: &str, _value: &str) -> Result<()> {
                Err(CoreError::storage("restricted context"))
            }
            fn remove(&self, _key: &str) -> Result<()> {
                Err(CoreError::storage("restricted context"))
            }
        }

        let holder = TokenHolder::new(Arc::new(BrokenStore));
        assert_eq!(holder.token(), None);

        // Saving still works in memory even when the mirror fails.
        holder.save_token("jwt-abc");
        assert_eq!(holder.token(), Some("jwt-abc".to_string()));
    }
}

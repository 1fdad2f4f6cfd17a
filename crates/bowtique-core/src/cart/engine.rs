//! The cart engine: authoritative line-item sequence with persistence and
//! change notification.
//!
//! Every mutation runs as one unit under a single lock: modify the sequence,
//! persist the whole snapshot to the backing store, then notify listeners in
//! registration order. Persistence failures are swallowed (the cart keeps
//! working in memory); listener panics are isolated so one broken consumer
//! cannot starve the others.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::cart::model::{CartItem, ProductId};
use crate::observe::{Registry, Subscription};
use crate::storage::{CART_KEY, KeyValueStore};

struct Inner {
    items: Vec<CartItem>,
    subscribers: Registry<[CartItem]>,
}

/// Authoritative cart state, shared by every surface that renders the cart.
///
/// Construct one per process at the composition root and hand out clones of
/// the `Arc` wrapping it; the engine itself carries no global state.
pub struct CartEngine {
    store: Arc<dyn KeyValueStore>,
    inner: Arc<Mutex<Inner>>,
}

impl CartEngine {
    /// Creates an engine seeded from the backing store.
    ///
    /// A missing or malformed stored snapshot yields an empty cart; seeding
    /// never fails.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let items = match store.get(CART_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(err) => {
                    warn!(error = %err, "stored cart is malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to read stored cart, starting empty");
                Vec::new()
            }
        };

        Self {
            store,
            inner: Arc::new(Mutex::new(Inner {
                items,
                subscribers: Registry::new(),
            })),
        }
    }

    /// Returns a defensive copy of the current line items.
    pub fn snapshot(&self) -> Vec<CartItem> {
        self.inner.lock().unwrap().items.clone()
    }

    /// Appends one unit to the end of the cart.
    ///
    /// No dedup happens here: adding the same product twice produces two
    /// entries (see [`CartItem`] for why).
    pub fn add(&self, item: CartItem) {
        let mut inner = self.inner.lock().unwrap();
        debug!(product = item.id, "adding item to cart");
        inner.items.push(item);
        self.persist(&inner.items);
        inner.subscribers.notify(&inner.items);
    }

    /// Removes **all** entries for the given product id.
    ///
    /// Listeners are notified even when nothing matched.
    pub fn remove(&self, id: ProductId) {
        let mut inner = self.inner.lock().unwrap();
        debug!(product = id, "removing all matching items from cart");
        inner.items.retain(|item| item.id != id);
        self.persist(&inner.items);
        inner.subscribers.notify(&inner.items);
    }

    /// Removes the first single entry for the given product id, preserving
    /// the relative order of the rest; no entries change when nothing matched.
    pub fn remove_one(&self, id: ProductId) {
        let mut inner = self.inner.lock().unwrap();
        debug!(product = id, "removing one matching item from cart");
        if let Some(position) = inner.items.iter().position(|item| item.id == id) {
            inner.items.remove(position);
        }
        self.persist(&inner.items);
        inner.subscribers.notify(&inner.items);
    }

    /// Empties the cart (e.g. after checkout). Idempotent; still notifies.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        debug!("clearing cart");
        inner.items.clear();
        self.persist(&inner.items);
        inner.subscribers.notify(&inner.items);
    }

    /// Registers `listener` for every future mutation and invokes it once
    /// immediately with the current snapshot, so a freshly mounted surface
    /// renders consistent state without a separate initial fetch.
    ///
    /// Listeners must not call back into the engine.
    pub fn subscribe(
        &self,
        listener: impl Fn(&[CartItem]) + Send + Sync + 'static,
    ) -> Subscription {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.subscribers.insert(Box::new(listener));
        inner.subscribers.replay(id, &inner.items);

        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.lock().unwrap().subscribers.remove(id);
            }
        })
    }

    /// Serializes the whole sequence under the fixed cart key, overwriting
    /// any prior value. Failures are logged and swallowed.
    fn persist(&self, items: &[CartItem]) {
        let payload = match serde_json::to_string(items) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "failed to serialize cart, skipping persist");
                return;
            }
        };
        if let Err(err) = self.store.set(CART_KEY, &payload) {
            warn!(error = %err, "failed to persist cart");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, Result};
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn item(id: ProductId, title: &str) -> CartItem {
        CartItem::new(id, title, 10.0)
    }

    #[test]
    fn test_persistence_round_trip() {
        let store = Arc::new(MemoryStore::new());

        let engine = CartEngine::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);
        engine.add(item(1, "Gift Box"));
        drop(engine);

        let revived = CartEngine::new(store as Arc<dyn KeyValueStore>);
        assert_eq!(revived.snapshot(), vec![item(1, "Gift Box")]);
    }

    #[test]
    fn test_additive_count_semantics() {
        let engine = CartEngine::new(Arc::new(MemoryStore::new()));
        for _ in 0..3 {
            engine.add(item(5, "Magazine"));
        }

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.iter().all(|entry| entry.id == 5));
    }

    #[test]
    fn test_remove_one_deletes_exactly_one_occurrence() {
        let engine = CartEngine::new(Arc::new(MemoryStore::new()));
        engine.add(item(1, "A"));
        engine.add(item(1, "A"));
        engine.add(item(2, "B"));

        engine.remove_one(1);
        assert_eq!(engine.snapshot(), vec![item(1, "A"), item(2, "B")]);
    }

    #[test]
    fn test_remove_one_without_match_keeps_items() {
        let engine = CartEngine::new(Arc::new(MemoryStore::new()));
        engine.add(item(2, "B"));
        engine.remove_one(99);
        assert_eq!(engine.snapshot(), vec![item(2, "B")]);
    }

    #[test]
    fn test_remove_deletes_all_matching() {
        let engine = CartEngine::new(Arc::new(MemoryStore::new()));
        engine.add(item(1, "A"));
        engine.add(item(1, "A"));
        engine.add(item(2, "B"));

        engine.remove(1);
        assert_eq!(engine.snapshot(), vec![item(2, "B")]);
    }

    #[test]
    fn test_subscribe_replays_current_snapshot() {
        let engine = CartEngine::new(Arc::new(MemoryStore::new()));
        engine.add(item(1, "A"));

        let replayed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&replayed);
        let _subscription = engine.subscribe(move |items| {
            sink.lock().unwrap().push(items.to_vec());
        });

        let seen = replayed.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], vec![item(1, "A")]);
    }

    #[test]
    fn test_notify_isolation_across_panicking_listener() {
        let engine = CartEngine::new(Arc::new(MemoryStore::new()));
        let _noisy = engine.subscribe(|items| {
            if !items.is_empty() {
                panic!("listener failure");
            }
        });

        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let _quiet = engine.subscribe(move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        engine.add(item(1, "A"));
        // One call for the replay, one for the add.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_clear_on_empty_cart_still_notifies() {
        let engine = CartEngine::new(Arc::new(MemoryStore::new()));

        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let _subscription = engine.subscribe(move |items| {
            assert!(items.is_empty());
            counted.fetch_add(1, Ordering::SeqCst);
        });

        engine.clear();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_malformed_storage_yields_empty_cart() {
        let store = Arc::new(MemoryStore::new());
        store.set(CART_KEY, "{not json").unwrap();

        let engine = CartEngine::new(store);
        assert!(engine.snapshot().is_empty());
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let engine = CartEngine::new(Arc::new(MemoryStore::new()));

        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let subscription = engine.subscribe(move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        subscription.unsubscribe();
        subscription.unsubscribe();
        engine.add(item(1, "A"));
        // Only the initial replay fired.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_persistence_failure_is_swallowed() {
        struct BrokenStore;

        impl KeyValueStore for BrokenStore {
            fn get(&self, _key: &str) -> Result<Option<String>> {
                Err(CoreError::storage("unavailable"))
            }
            fn set(&self, _key: &str, _value: &str) -> Result<()> {
                Err(CoreError::storage("unavailable"))
            }
            fn remove(&self, _key: &str) -> Result<()> {
                Err(CoreError::storage("unavailable"))
            }
        }

        let engine = CartEngine::new(Arc::new(BrokenStore));
        engine.add(item(1, "A"));
        assert_eq!(engine.snapshot().len(), 1);
    }
}

//! Listener registration and notification shared by the observable stores.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::warn;

pub(crate) type Listener<T> = Box<dyn Fn(&T) + Send + Sync>;

/// An ordered set of listeners keyed by registration id.
///
/// Listeners are invoked in registration order. A panicking listener is
/// isolated so the remaining listeners still receive the notification.
pub(crate) struct Registry<T: ?Sized> {
    listeners: Vec<(u64, Listener<T>)>,
    next_id: u64,
}

impl<T: ?Sized> Registry<T> {
    pub(crate) fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn insert(&mut self, listener: Listener<T>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: u64) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    pub(crate) fn notify(&self, value: &T) {
        for (id, listener) in &self.listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(value))).is_err() {
                warn!(listener = id, "listener panicked during notification");
            }
        }
    }

    /// Invokes a single listener by id, used for the immediate replay on
    /// subscription.
    pub(crate) fn replay(&self, id: u64, value: &T) {
        if let Some((_, listener)) = self
            .listeners
            .iter()
            .find(|(listener_id, _)| *listener_id == id)
        {
            if catch_unwind(AssertUnwindSafe(|| listener(value))).is_err() {
                warn!(listener = id, "listener panicked during replay");
            }
        }
    }
}

/// Handle returned by `subscribe`; deregisters the listener on demand.
///
/// Calling `unsubscribe` more than once is safe and does nothing after the
/// first call. Dropping the handle without calling it leaves the listener
/// registered for the lifetime of the store.
pub struct Subscription {
    cancel: Box<dyn Fn() + Send + Sync>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Box::new(cancel),
        }
    }

    pub fn unsubscribe(&self) {
        (self.cancel)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_notify_in_registration_order() {
        let mut registry: Registry<u32> = Registry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            registry.insert(Box::new(move |value: &u32| {
                seen.lock().unwrap().push((tag, *value));
            }));
        }

        registry.notify(&7);
        assert_eq!(*seen.lock().unwrap(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let mut registry: Registry<u32> = Registry::new();
        registry.insert(Box::new(|_| panic!("boom")));

        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        registry.insert(Box::new(move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        }));

        registry.notify(&1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry: Registry<u32> = Registry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let id = registry.insert(Box::new(move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        }));

        registry.remove(id);
        registry.remove(id);
        registry.notify(&1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

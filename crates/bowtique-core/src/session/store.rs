//! Observable store for cross-cutting UI state.
//!
//! Holds identity, the busy flag, cart visibility, and the earned coupon as
//! one aggregate with fine-grained setters. Every change notifies every
//! subscriber with a full state snapshot; selector-based subscriptions are a
//! render optimization the original store had, not a correctness concern, so
//! they are intentionally not reproduced here.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::auth::TokenHolder;
use crate::observe::{Registry, Subscription};
use crate::session::model::{SessionState, UserIdentity};

struct Inner {
    state: SessionState,
    subscribers: Registry<SessionState>,
}

/// One-per-process observable session state.
pub struct SessionStore {
    inner: Arc<Mutex<Inner>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: SessionState::default(),
                subscribers: Registry::new(),
            })),
        }
    }

    /// Returns a defensive copy of the current state.
    pub fn state(&self) -> SessionState {
        self.inner.lock().unwrap().state.clone()
    }

    /// Replaces the global busy flag.
    ///
    /// Plain last-writer-wins boolean: two overlapping requests trample each
    /// other's indicator. Kept as-is for behaviour parity with the original
    /// store; callers needing accuracy must coordinate themselves.
    pub fn set_loading(&self, loading: bool) {
        self.update(|state| state.loading = loading);
    }

    /// Replaces the cart-overlay visibility flag.
    pub fn set_cart_open(&self, open: bool) {
        self.update(|state| state.is_cart_open = open);
    }

    /// Replaces the identity snapshot. Accepts any shape; no validation.
    pub fn set_user(&self, user: Option<UserIdentity>) {
        self.update(|state| state.user = user);
    }

    /// Replaces the earned coupon code; `coupon_won` is derived from it.
    pub fn set_coupon(&self, code: Option<String>) {
        self.update(|state| state.coupon_code = code);
    }

    /// True iff a user is present and their role is "admin",
    /// case-insensitively. Absent role or absent user is false.
    pub fn is_admin(&self) -> bool {
        self.inner
            .lock()
            .unwrap()
            .state
            .user
            .as_ref()
            .and_then(|user| user.role.as_deref())
            .is_some_and(|role| role.eq_ignore_ascii_case("admin"))
    }

    /// Clears the bearer token, then the identity snapshot.
    ///
    /// Leaves `loading`, `is_cart_open` and the coupon untouched, and does
    /// not navigate; routing is the caller's responsibility.
    pub fn logout(&self, tokens: &TokenHolder) {
        debug!("logging out");
        tokens.clear_token();
        self.set_user(None);
    }

    /// Registers `listener` for every future change and invokes it once
    /// immediately with the current state.
    pub fn subscribe(
        &self,
        listener: impl Fn(&SessionState) + Send + Sync + 'static,
    ) -> Subscription {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.subscribers.insert(Box::new(listener));
        inner.subscribers.replay(id, &inner.state);

        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.lock().unwrap().subscribers.remove(id);
            }
        })
    }

    fn update(&self, apply: impl FnOnce(&mut SessionState)) {
        let mut inner = self.inner.lock().unwrap();
        apply(&mut inner.state);
        let Inner { state, subscribers } = &*inner;
        subscribers.notify(state);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

//! Composition root.
//!
//! Builds the one shared instance of each engine and wires them together
//! explicitly. UI layers receive these through injection instead of reaching
//! for import-time singletons, and cross-component signals (the coupon win)
//! travel over an explicit handle instead of a global event.

use std::sync::Arc;

use tracing::info;

use bowtique_client::{ApiError, ApiGateway, HttpAuthApi};
use bowtique_core::auth::TokenHolder;
use bowtique_core::cart::CartEngine;
use bowtique_core::coupon;
use bowtique_core::session::SessionStore;
use bowtique_core::storage::{KeyValueStore, MemoryStore};
use bowtique_infrastructure::JsonFileStore;

use crate::session_usecase::SessionUsecase;

/// Process-wide application wiring: one backing store, one token holder, one
/// cart engine, one session store, one gateway.
pub struct StorefrontApp {
    store: Arc<dyn KeyValueStore>,
    tokens: Arc<TokenHolder>,
    cart: Arc<CartEngine>,
    session: Arc<SessionStore>,
    gateway: Arc<ApiGateway>,
}

impl StorefrontApp {
    /// Wires the application against an explicit backing store.
    pub fn new(api_base: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let tokens = Arc::new(TokenHolder::new(Arc::clone(&store)));
        let cart = Arc::new(CartEngine::new(Arc::clone(&store)));
        let session = Arc::new(SessionStore::new());
        let gateway = Arc::new(ApiGateway::new(api_base, Arc::clone(&tokens))?);

        Ok(Self {
            store,
            tokens,
            cart,
            session,
            gateway,
        })
    }

    /// Wires the application against the default on-disk store, falling back
    /// to a memory-only store when no durable location is available (the
    /// restricted-context case: nothing survives the process, but everything
    /// still works).
    pub fn with_default_store(api_base: impl Into<String>) -> Result<Self, ApiError> {
        let store: Arc<dyn KeyValueStore> = match JsonFileStore::open_default() {
            Ok(store) => Arc::new(store),
            Err(err) => {
                info!(error = %err, "no durable store available, using memory only");
                Arc::new(MemoryStore::new())
            }
        };
        Self::new(api_base, store)
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn tokens(&self) -> &Arc<TokenHolder> {
        &self.tokens
    }

    pub fn cart(&self) -> &Arc<CartEngine> {
        &self.cart
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn gateway(&self) -> &Arc<ApiGateway> {
        &self.gateway
    }

    /// Builds the session use-case over the live auth endpoints.
    pub fn session_usecase(&self) -> SessionUsecase<HttpAuthApi> {
        SessionUsecase::new(
            HttpAuthApi::new(Arc::clone(&self.gateway)),
            Arc::clone(&self.tokens),
            Arc::clone(&self.session),
        )
    }

    /// Hands out the coupon-award channel wired to this app's session store.
    pub fn coupon_award(&self) -> CouponAward {
        CouponAward {
            session: Arc::clone(&self.session),
        }
    }
}

/// Explicit channel for the mini-game's win signal.
///
/// The game is constructed with this handle and calls [`CouponAward::award`]
/// when the last brick falls; the handle feeds the session store directly.
pub struct CouponAward {
    session: Arc<SessionStore>,
}

impl CouponAward {
    /// Records a win. A caller-supplied code is taken as-is; absent one, a
    /// cosmetic code is generated.
    pub fn award(&self, code: Option<String>) -> String {
        let code = code.unwrap_or_else(coupon::generate_code);
        self.session.set_coupon(Some(code.clone()));
        code
    }
}

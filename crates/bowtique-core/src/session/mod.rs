//! Session domain: identity snapshot and the cross-cutting UI state store.

pub mod model;
pub mod store;

pub use model::{SessionState, UserIdentity};
pub use store::SessionStore;

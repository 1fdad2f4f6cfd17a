//! Cart domain: line-item model, the engine, and consumer-side helpers.

pub mod engine;
pub mod model;
pub mod summary;

pub use engine::CartEngine;
pub use model::{CartItem, ProductId};
pub use summary::{CartLine, summarize};

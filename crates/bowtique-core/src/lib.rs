pub mod auth;
pub mod cart;
pub mod coupon;
pub mod error;
pub mod observe;
pub mod session;
pub mod storage;

// Re-export common error type
pub use error::{CoreError, Result};

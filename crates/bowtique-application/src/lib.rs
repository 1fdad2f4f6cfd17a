//! Application tier: the composition root and session use-cases.

pub mod app;
pub mod session_usecase;

pub use app::{CouponAward, StorefrontApp};
pub use session_usecase::SessionUsecase;

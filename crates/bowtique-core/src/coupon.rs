//! Promotional coupon code generation.
//!
//! The mini-game awards a coupon on a win; the code is a fixed prefix plus a
//! random four-digit suffix. Purely cosmetic: it has to look unique but
//! carries no uniqueness or cryptographic guarantee.

use rand::Rng;

/// Fixed prefix carried by every generated code.
pub const COUPON_PREFIX: &str = "BOW20";

/// Generates a display code like `BOW20-4821`.
pub fn generate_code() -> String {
    let suffix = rand::thread_rng().gen_range(1000..10000);
    format!("{COUPON_PREFIX}-{suffix}")
}

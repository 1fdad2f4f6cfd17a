//! Cart line-item domain model.

use serde::{Deserialize, Serialize};

/// Product identifier, unique per product (not per line).
pub type ProductId = i64;

/// One unit of a product placed in the cart.
///
/// The cart is a flat ordered sequence of these: **one entry per unit
/// added**, never a quantity-bearing aggregate. A product added three times
/// appears as three equal entries, and consumers that need a quantity derive
/// it by grouping on `id` (see [`crate::cart::summary`]). This is load-bearing
/// for several display surfaces; do not collapse entries in the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier shared by every unit of the same product.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Unit price, currency-agnostic; callers append the unit of account.
    pub price: f64,
    /// Reference to a display asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Opaque customization data (e.g. a personalization message).
    /// The engine never inspects it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl CartItem {
    pub fn new(id: ProductId, title: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: None,
            payload: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialization_omits_absent_fields() {
        let item = CartItem::new(1, "Gift Box", 24.5);
        let raw = serde_json::to_string(&item).unwrap();
        assert!(!raw.contains("image"));
        assert!(!raw.contains("payload"));
    }

    #[test]
    fn test_round_trip_with_payload() {
        let item = CartItem::new(7, "Magazine", 9.0)
            .with_image("/img/magazine.png")
            .with_payload(json!({"note": "happy birthday"}));

        let raw = serde_json::to_string(&item).unwrap();
        let back: CartItem = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, item);
    }
}

//! Consumer-side quantity grouping.
//!
//! The engine stores one entry per unit and performs no grouping itself;
//! surfaces that display "Magazine x3" derive the quantity here, at read
//! time, from a snapshot.

use std::collections::HashMap;

use crate::cart::model::{CartItem, ProductId};

/// A display row: the first-seen entry for a product plus how many units of
/// it the snapshot contains.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item: CartItem,
    pub quantity: usize,
}

impl CartLine {
    /// Line subtotal (unit price times quantity).
    pub fn subtotal(&self) -> f64 {
        self.item.price * self.quantity as f64
    }
}

/// Groups a snapshot by product id, preserving first-seen order.
pub fn summarize(items: &[CartItem]) -> Vec<CartLine> {
    let mut lines: Vec<CartLine> = Vec::new();
    let mut index_by_id: HashMap<ProductId, usize> = HashMap::new();

    for item in items {
        match index_by_id.get(&item.id) {
            Some(&index) => lines[index].quantity += 1,
            None => {
                index_by_id.insert(item.id, lines.len());
                lines.push(CartLine {
                    item: item.clone(),
                    quantity: 1,
                });
            }
        }
    }

    lines
}

/// Total price across a snapshot, one unit per entry.
pub fn total(items: &[CartItem]) -> f64 {
    items.iter().map(|item| item.price).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: ProductId, title: &str, price: f64) -> CartItem {
        CartItem::new(id, title, price)
    }

    #[test]
    fn test_summarize_counts_repeated_entries() {
        let items = vec![
            item(1, "A", 2.0),
            item(2, "B", 3.0),
            item(1, "A", 2.0),
            item(1, "A", 2.0),
        ];

        let lines = summarize(&items);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].item.id, 1);
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(lines[1].item.id, 2);
        assert_eq!(lines[1].quantity, 1);
    }

    #[test]
    fn test_summarize_preserves_first_seen_order() {
        let items = vec![item(9, "Z", 1.0), item(3, "C", 1.0), item(9, "Z", 1.0)];
        let ids: Vec<ProductId> = summarize(&items).iter().map(|l| l.item.id).collect();
        assert_eq!(ids, vec![9, 3]);
    }

    #[test]
    fn test_totals() {
        let items = vec![item(1, "A", 2.5), item(1, "A", 2.5), item(2, "B", 5.0)];
        assert_eq!(total(&items), 10.0);

        let lines = summarize(&items);
        assert_eq!(lines[0].subtotal(), 5.0);
    }

    #[test]
    fn test_empty_snapshot() {
        assert!(summarize(&[]).is_empty());
        assert_eq!(total(&[]), 0.0);
    }
}

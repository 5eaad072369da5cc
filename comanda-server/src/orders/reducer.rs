//! Line item snapshot construction
//!
//! Event application itself lives in the appliers module; this module only
//! converts inputs into snapshots.

use crate::orders::money;
use shared::order::{LineItemInput, LineItemSnapshot};

/// Convert a LineItemInput into a LineItemSnapshot.
///
/// Assigns the stable `line_id` that kitchen-ticket entries reference, and
/// freezes the unit price (catalog price + add-ons) so later menu edits
/// never alter this order.
pub fn input_to_snapshot(input: &LineItemInput, added_at: i64) -> LineItemSnapshot {
    LineItemSnapshot {
        line_id: uuid::Uuid::new_v4().to_string(),
        item_id: input.item_id.clone(),
        name: input.name.clone(),
        price: money::to_f64(money::unit_price(input)),
        base_price: input.price,
        quantity: input.quantity,
        notes: input
            .notes
            .as_ref()
            .filter(|n| !n.trim().is_empty())
            .cloned(),
        addons: input.addons.clone(),
        added_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::AddonSnapshot;

    #[test]
    fn snapshot_freezes_unit_price_with_addons() {
        let input = LineItemInput {
            item_id: "item-1".to_string(),
            name: "Burger".to_string(),
            price: 18.0,
            quantity: 2,
            notes: Some("no onions".to_string()),
            addons: vec![AddonSnapshot {
                name: "Bacon".to_string(),
                price: 3.0,
            }],
        };
        let snapshot = input_to_snapshot(&input, 1234);
        assert_eq!(snapshot.price, 21.0);
        assert_eq!(snapshot.base_price, 18.0);
        assert_eq!(snapshot.quantity, 2);
        assert_eq!(snapshot.added_at, 1234);
        assert!(!snapshot.line_id.is_empty());
    }

    #[test]
    fn two_identical_inputs_get_distinct_line_ids() {
        let input = LineItemInput {
            item_id: "item-1".to_string(),
            name: "Coffee".to_string(),
            price: 4.0,
            quantity: 1,
            notes: None,
            addons: vec![],
        };
        let a = input_to_snapshot(&input, 0);
        let b = input_to_snapshot(&input, 0);
        assert_ne!(a.line_id, b.line_id);
    }

    #[test]
    fn blank_notes_are_dropped() {
        let input = LineItemInput {
            item_id: "item-1".to_string(),
            name: "Coffee".to_string(),
            price: 4.0,
            quantity: 1,
            notes: Some("   ".to_string()),
            addons: vec![],
        };
        assert_eq!(input_to_snapshot(&input, 0).notes, None);
    }
}

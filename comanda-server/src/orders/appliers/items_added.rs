//! ItemsAdded event applier

use crate::orders::money;
use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

/// ItemsAdded applier
pub struct ItemsAddedApplier;

impl EventApplier for ItemsAddedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::ItemsAdded { items, .. } = &event.payload {
            snapshot.items.extend(items.iter().cloned());
            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
            money::recalculate_totals(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::testing::create_line_item_snapshot;
    use shared::order::OrderEventType;

    fn items_added_event(order_id: &str, seq: u64, items: Vec<shared::order::LineItemSnapshot>) -> OrderEvent {
        OrderEvent::new(
            seq,
            order_id.to_string(),
            "staff-1".to_string(),
            "Ana".to_string(),
            "cmd-1".to_string(),
            Some(1234567890),
            OrderEventType::ItemsAdded,
            EventPayload::ItemsAdded {
                items,
                ticket_id: "ticket-1".to_string(),
            },
        )
    }

    #[test]
    fn single_batch_recomputes_totals() {
        let mut snapshot = OrderSnapshot::new("order-1".to_string());
        let event = items_added_event(
            "order-1",
            1,
            vec![
                create_line_item_snapshot("line-1", "Picanha", 20.0, 2),
                create_line_item_snapshot("line-2", "Farofa", 15.0, 1),
            ],
        );

        ItemsAddedApplier.apply(&mut snapshot, &event);

        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.subtotal, 55.0);
        assert_eq!(snapshot.service_fee, 5.5);
        assert_eq!(snapshot.total, 60.5);
        assert_eq!(snapshot.last_sequence, 1);
    }

    #[test]
    fn identical_lines_stay_separate() {
        // Two identical additions keep distinct line_ids, so removal can
        // target exactly one of them.
        let mut snapshot = OrderSnapshot::new("order-1".to_string());
        ItemsAddedApplier.apply(
            &mut snapshot,
            &items_added_event(
                "order-1",
                1,
                vec![create_line_item_snapshot("line-1", "Coffee", 4.0, 1)],
            ),
        );
        ItemsAddedApplier.apply(
            &mut snapshot,
            &items_added_event(
                "order-1",
                2,
                vec![create_line_item_snapshot("line-2", "Coffee", 4.0, 1)],
            ),
        );

        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.subtotal, 8.0);
        assert_eq!(snapshot.last_sequence, 2);
    }
}

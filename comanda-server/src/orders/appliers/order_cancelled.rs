//! OrderCancelled event applier

use crate::orders::traits::EventApplier;
use shared::order::{CancellationInfo, EventPayload, OrderEvent, OrderSnapshot, OrderStatus};

/// OrderCancelled applier
pub struct OrderCancelledApplier;

impl EventApplier for OrderCancelledApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderCancelled {
            reason,
            cancelled_by,
        } = &event.payload
        {
            snapshot.status = OrderStatus::Cancelled;
            snapshot.cancellation = Some(CancellationInfo {
                reason: reason.clone(),
                cancelled_at: event.timestamp,
                cancelled_by: cancelled_by.clone(),
            });
            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::OrderEventType;

    #[test]
    fn records_cancellation_metadata() {
        let event = OrderEvent::new(
            3,
            "order-1".to_string(),
            "staff-1".to_string(),
            "Ana".to_string(),
            "cmd-1".to_string(),
            None,
            OrderEventType::OrderCancelled,
            EventPayload::OrderCancelled {
                reason: "customer left".to_string(),
                cancelled_by: "staff-1".to_string(),
            },
        );

        let mut snapshot = OrderSnapshot::new("order-1".to_string());
        OrderCancelledApplier.apply(&mut snapshot, &event);

        assert_eq!(snapshot.status, OrderStatus::Cancelled);
        let cancellation = snapshot.cancellation.as_ref().unwrap();
        assert_eq!(cancellation.reason, "customer left");
        assert_eq!(cancellation.cancelled_by, "staff-1");
        assert_eq!(cancellation.cancelled_at, event.timestamp);
    }
}

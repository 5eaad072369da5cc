//! OrderOpened event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus};

/// OrderOpened applier
pub struct OrderOpenedApplier;

impl EventApplier for OrderOpenedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderOpened {
            restaurant_id,
            table_id,
            table_number,
            waiter_id,
            waiter_name,
        } = &event.payload
        {
            snapshot.order_id = event.order_id.clone();
            snapshot.restaurant_id = restaurant_id.clone();
            snapshot.table_id = table_id.clone();
            snapshot.table_number = *table_number;
            snapshot.waiter_id = waiter_id.clone();
            snapshot.waiter_name = waiter_name.clone();
            snapshot.status = OrderStatus::Open;
            snapshot.created_at = event.timestamp;
            snapshot.updated_at = event.timestamp;
            snapshot.last_sequence = event.sequence;
        }
    }
}

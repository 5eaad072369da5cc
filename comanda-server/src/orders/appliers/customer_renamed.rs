//! CustomerRenamed event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

/// CustomerRenamed applier
pub struct CustomerRenamedApplier;

impl EventApplier for CustomerRenamedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::CustomerRenamed { customer_name } = &event.payload {
            snapshot.waiter_name = customer_name.clone();
            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
        }
    }
}

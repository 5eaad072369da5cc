//! ItemRemoved event applier

use crate::orders::money;
use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

/// ItemRemoved applier
pub struct ItemRemovedApplier;

impl EventApplier for ItemRemovedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::ItemRemoved { line_id, .. } = &event.payload {
            snapshot.items.retain(|item| item.line_id != *line_id);
            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
            money::recalculate_totals(snapshot);
        }
    }
}

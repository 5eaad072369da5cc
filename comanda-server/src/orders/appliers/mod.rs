//! Event applier implementations
//!
//! Each applier implements the `EventApplier` trait and handles one
//! specific event type. Appliers are PURE functions: replaying the same
//! event stream always produces the same snapshot.

use enum_dispatch::enum_dispatch;

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

mod customer_renamed;
mod item_removed;
mod items_added;
mod order_cancelled;
mod order_opened;
mod order_paid;

pub use customer_renamed::CustomerRenamedApplier;
pub use item_removed::ItemRemovedApplier;
pub use items_added::ItemsAddedApplier;
pub use order_cancelled::OrderCancelledApplier;
pub use order_opened::OrderOpenedApplier;
pub use order_paid::OrderPaidApplier;

/// EventAction enum - dispatches to concrete applier implementations
#[enum_dispatch(EventApplier)]
pub enum EventAction {
    OrderOpened(OrderOpenedApplier),
    ItemsAdded(ItemsAddedApplier),
    ItemRemoved(ItemRemovedApplier),
    OrderPaid(OrderPaidApplier),
    OrderCancelled(OrderCancelledApplier),
    CustomerRenamed(CustomerRenamedApplier),
}

/// Convert OrderEvent reference to EventAction
///
/// This is the ONLY place with a match on EventPayload.
impl From<&OrderEvent> for EventAction {
    fn from(event: &OrderEvent) -> Self {
        match &event.payload {
            EventPayload::OrderOpened { .. } => EventAction::OrderOpened(OrderOpenedApplier),
            EventPayload::ItemsAdded { .. } => EventAction::ItemsAdded(ItemsAddedApplier),
            EventPayload::ItemRemoved { .. } => EventAction::ItemRemoved(ItemRemovedApplier),
            EventPayload::OrderPaid { .. } => EventAction::OrderPaid(OrderPaidApplier),
            EventPayload::OrderCancelled { .. } => {
                EventAction::OrderCancelled(OrderCancelledApplier)
            }
            EventPayload::CustomerRenamed { .. } => {
                EventAction::CustomerRenamed(CustomerRenamedApplier)
            }
        }
    }
}

/// Replay an event stream into a fresh snapshot
pub fn replay(order_id: &str, events: &[OrderEvent]) -> OrderSnapshot {
    let mut snapshot = OrderSnapshot::new(order_id.to_string());
    for event in events {
        let applier: EventAction = event.into();
        applier.apply(&mut snapshot, event);
    }
    snapshot
}

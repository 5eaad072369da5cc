//! AddItems command handler
//!
//! Adds a batch of items to the table's open order, opening the order first
//! if the table has none. Each batch dispatches exactly one kitchen ticket.

use async_trait::async_trait;

use crate::orders::money;
use crate::orders::reducer::input_to_snapshot;
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::models::DiningTable;
use shared::order::{EventPayload, LineItemInput, OrderEvent, OrderEventType};

use super::validate_open;

/// AddItems action
///
/// The manager resolves the target table inside the write transaction and
/// pre-generates the ticket id so the dispatched ticket and the event agree.
pub struct AddItemsAction {
    pub table: DiningTable,
    pub items: Vec<LineItemInput>,
    pub ticket_id: String,
}

#[async_trait]
impl CommandHandler for AddItemsAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::InvalidOperation(
                "at least one item is required".to_string(),
            ));
        }
        for item in &self.items {
            money::validate_line_item(item)?;
        }

        let mut events = Vec::new();

        // Resolve the open order for this table, or open one
        let order_id = match ctx.find_active_order_for_table(&self.table.id)? {
            Some(order_id) => {
                let snapshot = ctx.load_snapshot(&order_id)?;
                validate_open(&snapshot)?;
                order_id
            }
            None => {
                let order_id = uuid::Uuid::new_v4().to_string();
                let seq = ctx.next_sequence();
                events.push(OrderEvent::new(
                    seq,
                    order_id.clone(),
                    metadata.operator_id.clone(),
                    metadata.operator_name.clone(),
                    metadata.command_id.clone(),
                    Some(metadata.timestamp),
                    OrderEventType::OrderOpened,
                    EventPayload::OrderOpened {
                        restaurant_id: self.table.restaurant_id.clone(),
                        table_id: self.table.id.clone(),
                        table_number: self.table.number,
                        waiter_id: metadata.operator_id.clone(),
                        waiter_name: metadata.operator_name.clone(),
                    },
                ));
                order_id
            }
        };

        let now = chrono::Utc::now().timestamp_millis();
        let item_snapshots: Vec<_> = self
            .items
            .iter()
            .map(|item| input_to_snapshot(item, now))
            .collect();

        let seq = ctx.next_sequence();
        events.push(OrderEvent::new(
            seq,
            order_id,
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::ItemsAdded,
            EventPayload::ItemsAdded {
                items: item_snapshots,
                ticket_id: self.ticket_id.clone(),
            },
        ));

        Ok(events)
    }
}

//! RemoveItem command handler
//!
//! Removes one line item by its stable id. The manager shrinks the matching
//! kitchen-ticket entry in the same transaction.

use async_trait::async_trait;

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType};

use super::validate_open;

/// RemoveItem action
pub struct RemoveItemAction {
    pub order_id: String,
    pub line_id: String,
    pub reason: Option<String>,
}

#[async_trait]
impl CommandHandler for RemoveItemAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let snapshot = ctx.load_snapshot(&self.order_id)?;
        validate_open(&snapshot)?;

        if snapshot.find_item(&self.line_id).is_none() {
            return Err(OrderError::LineItemNotFound(self.line_id.clone()));
        }

        let reason = self
            .reason
            .as_ref()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::ItemRemoved,
            EventPayload::ItemRemoved {
                line_id: self.line_id.clone(),
                reason,
            },
        );

        Ok(vec![event])
    }
}

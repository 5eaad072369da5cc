//! CancelOrder command handler
//!
//! Cancels an open order. The reason is mandatory; the manager cascades the
//! cancellation to every non-terminal kitchen ticket and frees the table in
//! the same transaction.

use async_trait::async_trait;

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType};

use super::validate_open;

/// CancelOrder action
pub struct CancelOrderAction {
    pub order_id: String,
    pub reason: String,
}

#[async_trait]
impl CommandHandler for CancelOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let reason = self.reason.trim();
        if reason.is_empty() {
            return Err(OrderError::ReasonRequired);
        }

        let snapshot = ctx.load_snapshot(&self.order_id)?;
        validate_open(&snapshot)?;

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::OrderCancelled,
            EventPayload::OrderCancelled {
                reason: reason.to_string(),
                cancelled_by: metadata.operator_id.clone(),
            },
        );

        Ok(vec![event])
    }
}

//! UpdateCustomerName command handler
//!
//! Renames the customer shown on a self-service order.

use async_trait::async_trait;

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType};

use super::validate_open;

/// UpdateCustomerName action
pub struct UpdateCustomerNameAction {
    pub order_id: String,
    pub customer_name: String,
}

#[async_trait]
impl CommandHandler for UpdateCustomerNameAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let name = self.customer_name.trim();
        if name.is_empty() {
            return Err(OrderError::InvalidOperation(
                "customer name must not be empty".to_string(),
            ));
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
            OrderEventType::CustomerRenamed,
            EventPayload::CustomerRenamed {
                customer_name: name.to_string(),
            },
        );

        Ok(vec![event])
    }
}

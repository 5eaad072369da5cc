//! Checkout command handler
//!
//! Closes the check: marks the order paid, optionally waiving the 10%
//! service fee. The manager frees the table in the same transaction.

use async_trait::async_trait;

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, PaymentMethod};

use super::validate_open;

/// Checkout action
pub struct CheckoutAction {
    pub order_id: String,
    pub payment_method: PaymentMethod,
    pub waive_service_fee: bool,
}

#[async_trait]
impl CommandHandler for CheckoutAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let snapshot = ctx.load_snapshot(&self.order_id)?;
        validate_open(&snapshot)?;

        if snapshot.items.is_empty() {
            return Err(OrderError::EmptyOrder(self.order_id.clone()));
        }

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::OrderPaid,
            EventPayload::OrderPaid {
                payment_method: self.payment_method,
                service_fee_waived: self.waive_service_fee,
                paid_by: metadata.operator_id.clone(),
            },
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::storage::OrderStorage;
    use crate::orders::testing::{
        create_line_item_snapshot, create_test_metadata, open_test_order,
    };
    use shared::order::OrderStatus;

    #[tokio::test]
    async fn checkout_emits_order_paid() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();

        let mut snapshot = open_test_order(&storage, &txn, "order-1", "table-1", OrderStatus::Open);
        snapshot.items = vec![create_line_item_snapshot("line-1", "Picanha", 20.0, 2)];
        storage.store_snapshot(&txn, &snapshot).unwrap();

        let mut ctx = CommandContext::new(&txn, &storage, 1);
        let action = CheckoutAction {
            order_id: "order-1".to_string(),
            payment_method: PaymentMethod::Pix,
            waive_service_fee: true,
        };

        let events = action
            .execute(&mut ctx, &create_test_metadata())
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        if let EventPayload::OrderPaid {
            payment_method,
            service_fee_waived,
            paid_by,
        } = &events[0].payload
        {
            assert_eq!(*payment_method, PaymentMethod::Pix);
            assert!(*service_fee_waived);
            assert_eq!(paid_by, "staff-1");
        } else {
            panic!("Expected OrderPaid payload");
        }
    }

    #[tokio::test]
    async fn empty_order_cannot_be_checked_out() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        open_test_order(&storage, &txn, "order-1", "table-1", OrderStatus::Open);

        let mut ctx = CommandContext::new(&txn, &storage, 1);
        let action = CheckoutAction {
            order_id: "order-1".to_string(),
            payment_method: PaymentMethod::Cash,
            waive_service_fee: false,
        };

        let result = action.execute(&mut ctx, &create_test_metadata()).await;
        assert!(matches!(result, Err(OrderError::EmptyOrder(_))));
    }

    #[tokio::test]
    async fn terminal_order_cannot_be_checked_out_again() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();

        for (order_id, status) in [
            ("order-paid", OrderStatus::Paid),
            ("order-cancelled", OrderStatus::Cancelled),
        ] {
            let mut snapshot = open_test_order(&storage, &txn, order_id, "table-1", status);
            snapshot.items = vec![create_line_item_snapshot("line-1", "Picanha", 20.0, 1)];
            storage.store_snapshot(&txn, &snapshot).unwrap();

            let mut ctx = CommandContext::new(&txn, &storage, 1);
            let action = CheckoutAction {
                order_id: order_id.to_string(),
                payment_method: PaymentMethod::Cash,
                waive_service_fee: false,
            };
            let result = action.execute(&mut ctx, &create_test_metadata()).await;
            assert!(matches!(result, Err(OrderError::OrderNotOpen { .. })));
        }
    }

    #[tokio::test]
    async fn missing_order_is_reported() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();

        let mut ctx = CommandContext::new(&txn, &storage, 1);
        let action = CheckoutAction {
            order_id: "missing".to_string(),
            payment_method: PaymentMethod::Cash,
            waive_service_fee: false,
        };

        let result = action.execute(&mut ctx, &create_test_metadata()).await;
        assert!(matches!(result, Err(OrderError::OrderNotFound(_))));
    }
}

//! OrderPaid event applier

use crate::orders::money;
use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus, PaymentInfo};

/// OrderPaid applier
pub struct OrderPaidApplier;

impl EventApplier for OrderPaidApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderPaid {
            payment_method,
            service_fee_waived,
            paid_by,
        } = &event.payload
        {
            money::settle_totals(snapshot, *service_fee_waived);
            snapshot.status = OrderStatus::Paid;
            snapshot.payment = Some(PaymentInfo {
                method: *payment_method,
                paid_at: event.timestamp,
                paid_by: paid_by.clone(),
            });
            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::testing::create_line_item_snapshot;
    use shared::order::{OrderEventType, PaymentMethod};

    fn order_paid_event(seq: u64, waived: bool) -> OrderEvent {
        OrderEvent::new(
            seq,
            "order-1".to_string(),
            "staff-1".to_string(),
            "Ana".to_string(),
            "cmd-1".to_string(),
            None,
            OrderEventType::OrderPaid,
            EventPayload::OrderPaid {
                payment_method: PaymentMethod::CreditCard,
                service_fee_waived: waived,
                paid_by: "staff-1".to_string(),
            },
        )
    }

    #[test]
    fn settles_with_service_fee() {
        let mut snapshot = OrderSnapshot::new("order-1".to_string());
        snapshot.items = vec![create_line_item_snapshot("line-1", "Picanha", 50.0, 2)];
        money::recalculate_totals(&mut snapshot);

        OrderPaidApplier.apply(&mut snapshot, &order_paid_event(2, false));

        assert_eq!(snapshot.status, OrderStatus::Paid);
        assert_eq!(snapshot.subtotal, 100.0);
        assert_eq!(snapshot.service_fee, 10.0);
        assert_eq!(snapshot.total, 110.0);
        let payment = snapshot.payment.as_ref().unwrap();
        assert_eq!(payment.method, PaymentMethod::CreditCard);
        assert_eq!(payment.paid_by, "staff-1");
    }

    #[test]
    fn waiver_zeroes_the_fee() {
        let mut snapshot = OrderSnapshot::new("order-1".to_string());
        snapshot.items = vec![create_line_item_snapshot("line-1", "Picanha", 50.0, 2)];
        money::recalculate_totals(&mut snapshot);
        assert_eq!(snapshot.total, 110.0);

        OrderPaidApplier.apply(&mut snapshot, &order_paid_event(2, true));

        assert_eq!(snapshot.service_fee, 0.0);
        assert_eq!(snapshot.total, 100.0);
    }
}

//! Order snapshot - computed state from event stream

use super::types::{LineItemSnapshot, PaymentMethod};
use serde::{Deserialize, Serialize};

/// Order status
///
/// OPEN is the only non-terminal state; PAID and CANCELLED are terminal and
/// both free the table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Open,
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OrderStatus::Open)
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Open, OrderStatus::Paid) | (OrderStatus::Open, OrderStatus::Cancelled)
        )
    }
}

/// Payment metadata recorded at checkout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentInfo {
    pub method: PaymentMethod,
    pub paid_at: i64,
    pub paid_by: String,
}

/// Cancellation metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CancellationInfo {
    pub reason: String,
    pub cancelled_at: i64,
    pub cancelled_by: String,
}

/// Order snapshot - computed from event stream
///
/// Money invariant, maintained by the appliers:
/// `subtotal = Σ(item.price × item.quantity)`,
/// `service_fee = subtotal × 0.10` (0 once waived at checkout),
/// `total = subtotal + service_fee`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSnapshot {
    /// Order ID (assigned by server)
    pub order_id: String,
    pub restaurant_id: String,
    pub table_id: String,
    /// Denormalized table number snapshot
    pub table_number: u32,
    /// Staff id, or "CUSTOMER" for self-service orders
    pub waiter_id: String,
    /// Display name; mutable for customer-named orders
    pub waiter_name: String,
    pub status: OrderStatus,
    /// Ordered line items
    pub items: Vec<LineItemSnapshot>,
    pub subtotal: f64,
    pub service_fee: f64,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation: Option<CancellationInfo>,
    /// Creation timestamp
    pub created_at: i64,
    /// Last update timestamp
    pub updated_at: i64,
    /// Last applied event sequence (for incremental updates)
    pub last_sequence: u64,
}

impl OrderSnapshot {
    /// Create a new empty order
    pub fn new(order_id: String) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            order_id,
            restaurant_id: String::new(),
            table_id: String::new(),
            table_number: 0,
            waiter_id: String::new(),
            waiter_name: String::new(),
            status: OrderStatus::Open,
            items: Vec::new(),
            subtotal: 0.0,
            service_fee: 0.0,
            total: 0.0,
            payment: None,
            cancellation: None,
            created_at: now,
            updated_at: now,
            last_sequence: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }

    pub fn is_paid(&self) -> bool {
        self.status == OrderStatus::Paid
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == OrderStatus::Cancelled
    }

    /// Find a line item by its stable id
    pub fn find_item(&self, line_id: &str) -> Option<&LineItemSnapshot> {
        self.items.iter().find(|i| i.line_id == line_id)
    }
}

impl Default for OrderSnapshot {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_is_the_only_non_terminal_state() {
        assert!(!OrderStatus::Open.is_terminal());
        assert!(OrderStatus::Paid.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn terminal_states_admit_no_transition() {
        assert!(OrderStatus::Open.can_transition_to(OrderStatus::Paid));
        assert!(OrderStatus::Open.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Paid.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Paid));
        assert!(!OrderStatus::Paid.can_transition_to(OrderStatus::Open));
    }
}

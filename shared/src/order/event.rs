//! Order events - immutable facts recorded after command processing

use super::types::{LineItemSnapshot, PaymentMethod};
use serde::{Deserialize, Serialize};

/// Order event - immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Event unique ID
    pub event_id: String,
    /// Global sequence number (for ordering and replay)
    pub sequence: u64,
    /// Order this event belongs to
    pub order_id: String,
    /// Server timestamp (Unix milliseconds) - authoritative for state evolution
    pub timestamp: i64,
    /// Client timestamp (Unix milliseconds) - for audit, may differ due to clock skew
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_timestamp: Option<i64>,
    /// Operator who triggered this event
    pub operator_id: String,
    /// Operator name (snapshot for audit)
    pub operator_name: String,
    /// Command that triggered this event (for audit tracing)
    pub command_id: String,
    /// Event type
    pub event_type: OrderEventType,
    /// Event payload
    pub payload: EventPayload,
}

impl OrderEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        order_id: String,
        operator_id: String,
        operator_name: String,
        command_id: String,
        client_timestamp: Option<i64>,
        event_type: OrderEventType,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            order_id,
            timestamp: chrono::Utc::now().timestamp_millis(),
            client_timestamp,
            operator_id,
            operator_name,
            command_id,
            event_type,
            payload,
        }
    }
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    OrderOpened,
    ItemsAdded,
    ItemRemoved,
    OrderPaid,
    OrderCancelled,
    CustomerRenamed,
}

impl std::fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderEventType::OrderOpened => write!(f, "ORDER_OPENED"),
            OrderEventType::ItemsAdded => write!(f, "ITEMS_ADDED"),
            OrderEventType::ItemRemoved => write!(f, "ITEM_REMOVED"),
            OrderEventType::OrderPaid => write!(f, "ORDER_PAID"),
            OrderEventType::OrderCancelled => write!(f, "ORDER_CANCELLED"),
            OrderEventType::CustomerRenamed => write!(f, "CUSTOMER_RENAMED"),
        }
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    /// First item add on a free table opens the order.
    OrderOpened {
        restaurant_id: String,
        table_id: String,
        table_number: u32,
        waiter_id: String,
        waiter_name: String,
    },
    /// One add batch; dispatches exactly one kitchen ticket.
    ItemsAdded {
        items: Vec<LineItemSnapshot>,
        ticket_id: String,
    },
    ItemRemoved {
        line_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    OrderPaid {
        payment_method: PaymentMethod,
        service_fee_waived: bool,
        paid_by: String,
    },
    OrderCancelled {
        reason: String,
        cancelled_by: String,
    },
    CustomerRenamed { customer_name: String },
}

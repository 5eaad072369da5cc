//! Order commands - client intents, validated by the server

use super::types::{LineItemInput, PaymentMethod};
use serde::{Deserialize, Serialize};

/// Order command envelope
///
/// `command_id` is client-generated and used for idempotent replay: a
/// command that was already processed is acknowledged without re-execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCommand {
    pub command_id: String,
    pub restaurant_id: String,
    /// Staff id, or [`super::CUSTOMER_WAITER_ID`] for self-service
    pub operator_id: String,
    pub operator_name: String,
    /// Client timestamp (Unix milliseconds); the server records its own
    /// authoritative timestamp on the resulting events
    pub timestamp: i64,
    pub payload: OrderCommandPayload,
}

/// Command payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderCommandPayload {
    /// Add items to the table's open order, opening one if none exists.
    AddItems {
        table_id: String,
        items: Vec<LineItemInput>,
    },
    /// Remove one line item by its stable id.
    RemoveItem {
        order_id: String,
        line_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Close the check: recompute the total with or without the service
    /// fee, mark the order paid and free the table.
    Checkout {
        order_id: String,
        payment_method: PaymentMethod,
        #[serde(default)]
        waive_service_fee: bool,
    },
    /// Cancel the order. `reason` must be non-blank.
    CancelOrder { order_id: String, reason: String },
    /// Rename the customer shown on a self-service order.
    UpdateCustomerName {
        order_id: String,
        customer_name: String,
    },
}

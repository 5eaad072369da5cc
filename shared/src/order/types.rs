//! Shared types for order event sourcing

use serde::{Deserialize, Serialize};

/// Sentinel waiter id for self-service orders placed from the customer menu.
pub const CUSTOMER_WAITER_ID: &str = "CUSTOMER";

/// Payment method recorded at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Pix,
    Other,
}

/// Add-on selection snapshot ({name, price} captured at add time)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddonSnapshot {
    pub name: String,
    pub price: f64,
}

/// Line item input - for adding items (without line_id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemInput {
    /// Menu item ID
    pub item_id: String,
    /// Item name snapshot
    pub name: String,
    /// Catalog unit price snapshot (before add-ons)
    pub price: f64,
    /// Quantity (>= 1)
    pub quantity: u32,
    /// Free-text notes for the kitchen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Selected add-ons
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addons: Vec<AddonSnapshot>,
}

/// Line item snapshot - complete snapshot for event recording
///
/// `line_id` is assigned once when the line is added and never changes;
/// kitchen ticket entries reference it 1:1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemSnapshot {
    /// Stable unique line identifier
    pub line_id: String,
    /// Menu item ID
    pub item_id: String,
    /// Item name snapshot
    pub name: String,
    /// Unit price including add-ons; a snapshot, never a live reference
    pub price: f64,
    /// Catalog price before add-ons
    pub base_price: f64,
    /// Quantity (>= 1)
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addons: Vec<AddonSnapshot>,
    /// Unix milliseconds
    pub added_at: i64,
}

impl LineItemSnapshot {
    /// Display name for kitchen tickets: add-on names folded in.
    pub fn kitchen_label(&self) -> String {
        if self.addons.is_empty() {
            self.name.clone()
        } else {
            let addon_names: Vec<&str> = self.addons.iter().map(|a| a.name.as_str()).collect();
            format!("{} (+ {})", self.name, addon_names.join(", "))
        }
    }
}

/// Command response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// The command ID this responds to
    pub command_id: String,
    /// Whether the command succeeded
    pub success: bool,
    /// Order ID (set when the command opened or targeted an order)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Kitchen ticket dispatched by this command, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    /// Error details if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl CommandResponse {
    pub fn success(command_id: String, order_id: Option<String>, ticket_id: Option<String>) -> Self {
        Self {
            command_id,
            success: true,
            order_id,
            ticket_id,
            error: None,
        }
    }

    pub fn error(command_id: String, error: CommandError) -> Self {
        Self {
            command_id,
            success: false,
            order_id: None,
            ticket_id: None,
            error: Some(error),
        }
    }

    /// Duplicate command: acknowledged without re-execution.
    pub fn duplicate(command_id: String) -> Self {
        Self {
            command_id,
            success: true,
            order_id: None,
            ticket_id: None,
            error: None,
        }
    }
}

/// Command error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
    pub code: CommandErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn new(code: CommandErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Command error codes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandErrorCode {
    OrderNotFound,
    TableNotFound,
    TableOccupied,
    OrderNotOpen,
    EmptyOrder,
    ReasonRequired,
    LineItemNotFound,
    InvalidQuantity,
    InvalidAmount,
    InvalidOperation,
    InternalError,
}

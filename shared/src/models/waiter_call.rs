//! Waiter call model

use serde::{Deserialize, Serialize};

/// Waiter call status; terminal on ATTENDED.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallStatus {
    #[default]
    Pending,
    Attended,
}

/// Table-initiated service request
///
/// Each button press creates a new record; there is no dedup and no expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaiterCall {
    pub id: String,
    pub restaurant_id: String,
    pub table_number: u32,
    pub status: CallStatus,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attended_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attended_by_staff_id: Option<String>,
}

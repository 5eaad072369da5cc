//! Activity log model - append-only staff action records

use serde::{Deserialize, Serialize};

/// Logged staff action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    OrderOpened,
    ItemRemoved,
    OrderPaid,
    OrderCancelled,
    CallAttended,
    Login,
    LoginFailed,
}

/// Activity log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    pub restaurant_id: String,
    pub staff_id: String,
    pub staff_name: String,
    pub action: ActivityAction,
    pub entity_type: String,
    pub entity_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub created_at: i64,
}

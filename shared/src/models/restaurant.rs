//! Restaurant Model

use serde::{Deserialize, Serialize};

/// Restaurant entity
///
/// Created at signup; blocked/unblocked by the super-admin. Never
/// hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub owner_email: String,
    pub is_active: bool,
    pub is_blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    /// Unix milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_at: Option<i64>,
    pub created_at: i64,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub owner_email: String,
}

//! Staff Model

use serde::{Deserialize, Serialize};

/// Staff role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Admin,
    Waiter,
    Kitchen,
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaffRole::Admin => write!(f, "ADMIN"),
            StaffRole::Waiter => write!(f, "WAITER"),
            StaffRole::Kitchen => write!(f, "KITCHEN"),
        }
    }
}

/// Staff entity
///
/// PINs are stored as argon2 hashes only; the raw 4-digit PIN never leaves
/// the login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub login_id: String,
    #[serde(skip_serializing)]
    pub pin_hash: String,
    pub role: StaffRole,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create staff payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffCreate {
    pub restaurant_id: String,
    pub name: String,
    pub login_id: String,
    /// Raw 4-digit PIN; hashed before storage
    pub pin: String,
    pub role: StaffRole,
}

/// Update staff payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<StaffRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

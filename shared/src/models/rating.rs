//! Rating Model

use serde::{Deserialize, Serialize};

/// Customer rating, submitted once per paid order; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: String,
    pub restaurant_id: String,
    pub order_id: String,
    pub table_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiter_name: Option<String>,
    /// 1-5
    pub stars: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: i64,
}

/// Create rating payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingCreate {
    pub order_id: String,
    pub stars: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

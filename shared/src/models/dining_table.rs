//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Table occupancy status
///
/// Transitions form a closed table; anything not listed in
/// [`TableStatus::can_transition_to`] is rejected by the registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    #[default]
    Free,
    InUse,
    AwaitingPayment,
}

impl TableStatus {
    /// Allowed transitions:
    ///
    /// ```text
    /// FREE -> IN_USE                      (occupy)
    /// IN_USE -> AWAITING_PAYMENT          (payment requested)
    /// AWAITING_PAYMENT -> IN_USE          (checkout abandoned)
    /// IN_USE | AWAITING_PAYMENT -> FREE   (order paid or cancelled)
    /// ```
    pub fn can_transition_to(self, next: TableStatus) -> bool {
        use TableStatus::*;
        matches!(
            (self, next),
            (Free, InUse)
                | (InUse, AwaitingPayment)
                | (AwaitingPayment, InUse)
                | (InUse, Free)
                | (AwaitingPayment, Free)
        )
    }

    pub fn is_occupied(self) -> bool {
        !matches!(self, TableStatus::Free)
    }
}

/// Dining table entity
///
/// `current_order_id` is a weak back-reference: the table does not own the
/// order, it only points at the one currently open on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: String,
    pub restaurant_id: String,
    /// Unique per restaurant
    pub number: u32,
    pub status: TableStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_waiter_id: Option<String>,
    pub created_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub restaurant_id: String,
    pub number: u32,
}

//! Kitchen ticket model
//!
//! One ticket is created per "add items" batch, so a single order usually
//! accumulates several tickets over its lifetime.

use serde::{Deserialize, Serialize};

/// Ticket preparation status
///
/// Forward-only: NEW -> IN_PREP -> READY -> DELIVERED, where any state may
/// skip straight to DELIVERED. CANCELLED is reachable only through the
/// order-level cancel cascade, never by a direct ticket update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    New,
    InPrep,
    Ready,
    Delivered,
    Cancelled,
}

impl TicketStatus {
    pub fn can_transition_to(self, next: TicketStatus) -> bool {
        use TicketStatus::*;
        matches!(
            (self, next),
            (New, InPrep)
                | (New, Ready)
                | (New, Delivered)
                | (New, Cancelled)
                | (InPrep, Ready)
                | (InPrep, Delivered)
                | (InPrep, Cancelled)
                | (Ready, Delivered)
                | (Ready, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TicketStatus::Delivered | TicketStatus::Cancelled)
    }
}

/// One line of a kitchen ticket
///
/// `line_id` references the order line item that produced this entry, so
/// item removal shrinks exactly the right entry instead of guessing by
/// name/quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketItem {
    pub line_id: String,
    /// Display name; add-on names are folded in, e.g. "Burger (+ Bacon)"
    pub name: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Kitchen ticket entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenTicket {
    pub id: String,
    pub restaurant_id: String,
    pub order_id: String,
    pub table_number: u32,
    pub waiter_name: String,
    pub items: Vec<TicketItem>,
    pub status: TicketStatus,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_only_with_skip_to_delivered() {
        assert!(TicketStatus::New.can_transition_to(TicketStatus::Delivered));
        assert!(TicketStatus::InPrep.can_transition_to(TicketStatus::Delivered));
        assert!(!TicketStatus::Ready.can_transition_to(TicketStatus::InPrep));
        assert!(!TicketStatus::Delivered.can_transition_to(TicketStatus::InPrep));
        assert!(!TicketStatus::InPrep.can_transition_to(TicketStatus::New));
    }

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        for next in [
            TicketStatus::New,
            TicketStatus::InPrep,
            TicketStatus::Ready,
            TicketStatus::Delivered,
            TicketStatus::Cancelled,
        ] {
            assert!(!TicketStatus::Delivered.can_transition_to(next));
            assert!(!TicketStatus::Cancelled.can_transition_to(next));
        }
    }
}

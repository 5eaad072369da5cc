//! Kitchen ticket dispatcher
//!
//! Projects each "add items" batch into exactly one ticket and reflects
//! order-side changes back: item removal shrinks the matching entry (by its
//! stable `line_id`), order cancellation cascades to every non-terminal
//! ticket. Kitchen staff only ever move tickets forward.

use redb::{TableDefinition, WriteTransaction};
use thiserror::Error;
use tracing::info;

use crate::db::{self, Db};
use crate::utils::now_millis;
use shared::models::{KitchenTicket, TicketItem, TicketStatus};
use shared::order::{LineItemSnapshot, OrderSnapshot};

const TICKETS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kitchen_tickets");

/// Ticket errors
#[derive(Debug, Error)]
pub enum TicketError {
    #[error("Ticket not found: {0}")]
    NotFound(String),

    #[error("Ticket transition {from:?} -> {to:?} is not allowed")]
    InvalidTransition {
        from: TicketStatus,
        to: TicketStatus,
    },

    #[error("Tickets are cancelled through the order, not directly")]
    CancelViaOrderOnly,

    #[error("Ticket {0} is still active; only delivered or cancelled tickets can be deleted")]
    NotTerminal(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<crate::db::DbError> for TicketError {
    fn from(err: crate::db::DbError) -> Self {
        TicketError::Storage(err.to_string())
    }
}

pub type TicketResult<T> = Result<T, TicketError>;

/// Ticket dispatcher over the shared database
#[derive(Clone)]
pub struct TicketDispatcher {
    db: Db,
}

impl TicketDispatcher {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Build a ticket from one add batch. Entry names fold add-ons in, the
    /// way the kitchen reads them.
    pub fn build_ticket(
        ticket_id: &str,
        order: &OrderSnapshot,
        batch: &[LineItemSnapshot],
    ) -> KitchenTicket {
        KitchenTicket {
            id: ticket_id.to_string(),
            restaurant_id: order.restaurant_id.clone(),
            order_id: order.order_id.clone(),
            table_number: order.table_number,
            waiter_name: order.waiter_name.clone(),
            items: batch
                .iter()
                .map(|line| TicketItem {
                    line_id: line.line_id.clone(),
                    name: line.kitchen_label(),
                    quantity: line.quantity,
                    notes: line.notes.clone(),
                })
                .collect(),
            status: TicketStatus::New,
            created_at: now_millis(),
            delivered_at: None,
            cancelled_at: None,
        }
    }

    /// Store a freshly dispatched ticket (within the order transaction)
    pub fn dispatch_txn(&self, txn: &WriteTransaction, ticket: &KitchenTicket) -> TicketResult<()> {
        db::insert_json_txn(txn, TICKETS_TABLE, &ticket.id, ticket)?;
        info!(ticket_id = %ticket.id, order_id = %ticket.order_id, items = ticket.items.len(), "Kitchen ticket dispatched");
        Ok(())
    }

    pub fn get(&self, id: &str) -> TicketResult<KitchenTicket> {
        self.db
            .fetch_json(TICKETS_TABLE, id)?
            .ok_or_else(|| TicketError::NotFound(id.to_string()))
    }

    pub fn list_for_order(&self, order_id: &str) -> TicketResult<Vec<KitchenTicket>> {
        let mut tickets: Vec<KitchenTicket> = self
            .db
            .scan_json(TICKETS_TABLE)?
            .into_iter()
            .filter(|t: &KitchenTicket| t.order_id == order_id)
            .collect();
        tickets.sort_by_key(|t| t.created_at);
        Ok(tickets)
    }

    pub fn list_for_restaurant(&self, restaurant_id: &str) -> TicketResult<Vec<KitchenTicket>> {
        let mut tickets: Vec<KitchenTicket> = self
            .db
            .scan_json(TICKETS_TABLE)?
            .into_iter()
            .filter(|t: &KitchenTicket| t.restaurant_id == restaurant_id)
            .collect();
        tickets.sort_by_key(|t| t.created_at);
        Ok(tickets)
    }

    /// Kitchen-side status advance. CANCELLED is rejected here: it is only
    /// reachable through the order cancel cascade.
    pub fn set_status(&self, id: &str, next: TicketStatus) -> TicketResult<KitchenTicket> {
        if next == TicketStatus::Cancelled {
            return Err(TicketError::CancelViaOrderOnly);
        }
        let txn = self.db.begin_write()?;
        let mut ticket: KitchenTicket = db::fetch_json_txn(&txn, TICKETS_TABLE, id)?
            .ok_or_else(|| TicketError::NotFound(id.to_string()))?;
        if !ticket.status.can_transition_to(next) {
            return Err(TicketError::InvalidTransition {
                from: ticket.status,
                to: next,
            });
        }
        ticket.status = next;
        if next == TicketStatus::Delivered {
            ticket.delivered_at = Some(now_millis());
        }
        db::insert_json_txn(&txn, TICKETS_TABLE, id, &ticket)?;
        txn.commit().map_err(crate::db::DbError::from)?;
        info!(ticket_id = %id, status = ?next, "Kitchen ticket status updated");
        Ok(ticket)
    }

    /// Cancel every non-terminal ticket of an order (within the order
    /// transaction). Delivered tickets stay delivered.
    pub fn cancel_for_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
        cancelled_at: i64,
    ) -> TicketResult<usize> {
        let tickets: Vec<KitchenTicket> = db::scan_json_txn(txn, TICKETS_TABLE)?;
        let mut cancelled = 0;
        for mut ticket in tickets {
            if ticket.order_id != order_id || ticket.status.is_terminal() {
                continue;
            }
            ticket.status = TicketStatus::Cancelled;
            ticket.cancelled_at = Some(cancelled_at);
            db::insert_json_txn(txn, TICKETS_TABLE, &ticket.id.clone(), &ticket)?;
            cancelled += 1;
        }
        Ok(cancelled)
    }

    /// Remove the entry for a removed order line (within the order
    /// transaction). A ticket whose last entry is removed is cancelled, not
    /// deleted, so history stays intact.
    pub fn remove_line_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
        line_id: &str,
        removed_at: i64,
    ) -> TicketResult<bool> {
        let tickets: Vec<KitchenTicket> = db::scan_json_txn(txn, TICKETS_TABLE)?;
        for mut ticket in tickets {
            if ticket.order_id != order_id || ticket.status.is_terminal() {
                continue;
            }
            let before = ticket.items.len();
            ticket.items.retain(|item| item.line_id != line_id);
            if ticket.items.len() == before {
                continue;
            }
            if ticket.items.is_empty() {
                ticket.status = TicketStatus::Cancelled;
                ticket.cancelled_at = Some(removed_at);
            }
            db::insert_json_txn(txn, TICKETS_TABLE, &ticket.id.clone(), &ticket)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// History cleanup; only terminal tickets may be deleted.
    pub fn delete(&self, id: &str) -> TicketResult<bool> {
        let txn = self.db.begin_write()?;
        let ticket: KitchenTicket = db::fetch_json_txn(&txn, TICKETS_TABLE, id)?
            .ok_or_else(|| TicketError::NotFound(id.to_string()))?;
        if !ticket.status.is_terminal() {
            return Err(TicketError::NotTerminal(id.to_string()));
        }
        let existed = db::remove_txn(&txn, TICKETS_TABLE, id)?;
        txn.commit().map_err(crate::db::DbError::from)?;
        Ok(existed)
    }
}

//! Waiter-call queue
//!
//! Pending/attended queue of table-initiated service requests. Every button
//! press creates a new record: no dedup, no expiry.

use redb::TableDefinition;
use thiserror::Error;
use tracing::info;

use crate::db::{self, Db};
use crate::utils::now_millis;
use shared::models::{CallStatus, WaiterCall};

const CALLS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("waiter_calls");

/// Waiter-call errors
#[derive(Debug, Error)]
pub enum CallError {
    #[error("Call not found: {0}")]
    NotFound(String),

    #[error("Call {0} has already been attended")]
    AlreadyAttended(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<crate::db::DbError> for CallError {
    fn from(err: crate::db::DbError) -> Self {
        CallError::Storage(err.to_string())
    }
}

pub type CallResult<T> = Result<T, CallError>;

/// Waiter-call queue over the shared database
#[derive(Clone)]
pub struct CallQueue {
    db: Db,
}

impl CallQueue {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Customer presses "call waiter": a new PENDING record.
    pub fn call(&self, restaurant_id: &str, table_number: u32) -> CallResult<WaiterCall> {
        let call = WaiterCall {
            id: uuid::Uuid::new_v4().to_string(),
            restaurant_id: restaurant_id.to_string(),
            table_number,
            status: CallStatus::Pending,
            created_at: now_millis(),
            attended_at: None,
            attended_by_staff_id: None,
        };
        self.db.insert_json(CALLS_TABLE, &call.id, &call)?;
        info!(call_id = %call.id, table_number, "Waiter called");
        Ok(call)
    }

    /// Staff attends a pending call; terminal.
    pub fn attend(&self, call_id: &str, staff_id: &str) -> CallResult<WaiterCall> {
        let txn = self.db.begin_write()?;
        let mut call: WaiterCall = db::fetch_json_txn(&txn, CALLS_TABLE, call_id)?
            .ok_or_else(|| CallError::NotFound(call_id.to_string()))?;
        if call.status == CallStatus::Attended {
            return Err(CallError::AlreadyAttended(call_id.to_string()));
        }
        call.status = CallStatus::Attended;
        call.attended_at = Some(now_millis());
        call.attended_by_staff_id = Some(staff_id.to_string());
        db::insert_json_txn(&txn, CALLS_TABLE, call_id, &call)?;
        txn.commit().map_err(crate::db::DbError::from)?;
        info!(call_id = %call_id, staff_id = %staff_id, "Waiter call attended");
        Ok(call)
    }

    /// Pending calls for a restaurant, oldest first
    pub fn list_pending(&self, restaurant_id: &str) -> CallResult<Vec<WaiterCall>> {
        let mut calls: Vec<WaiterCall> = self
            .db
            .scan_json(CALLS_TABLE)?
            .into_iter()
            .filter(|c: &WaiterCall| {
                c.restaurant_id == restaurant_id && c.status == CallStatus::Pending
            })
            .collect();
        calls.sort_by_key(|c| c.created_at);
        Ok(calls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> CallQueue {
        CallQueue::new(Db::open_in_memory().unwrap())
    }

    #[test]
    fn each_press_creates_a_new_pending_record() {
        let queue = queue();
        queue.call("rest-1", 4).unwrap();
        queue.call("rest-1", 4).unwrap();

        let pending = queue.list_pending("rest-1").unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|c| c.status == CallStatus::Pending));
    }

    #[test]
    fn attend_is_terminal() {
        let queue = queue();
        let call = queue.call("rest-1", 4).unwrap();

        let attended = queue.attend(&call.id, "staff-1").unwrap();
        assert_eq!(attended.status, CallStatus::Attended);
        assert_eq!(attended.attended_by_staff_id.as_deref(), Some("staff-1"));
        assert!(attended.attended_at.is_some());

        assert!(matches!(
            queue.attend(&call.id, "staff-2"),
            Err(CallError::AlreadyAttended(_))
        ));
        assert!(queue.list_pending("rest-1").unwrap().is_empty());
    }

    #[test]
    fn pending_list_is_scoped_by_restaurant() {
        let queue = queue();
        queue.call("rest-1", 4).unwrap();
        queue.call("rest-2", 9).unwrap();

        let pending = queue.list_pending("rest-1").unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].table_number, 4);
    }
}

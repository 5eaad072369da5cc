//! Table registry
//!
//! Owns the set of tables for a restaurant: occupancy status and the link
//! to the active order. `occupy` and `free` take the caller's write
//! transaction so the order manager can flip table state atomically with
//! the order events; the check-then-set on occupancy therefore cannot race.

use redb::{TableDefinition, WriteTransaction};
use thiserror::Error;
use tracing::info;

use crate::db::{self, Db};
use crate::utils::now_millis;
use shared::models::{DiningTable, DiningTableCreate, TableStatus};

const TABLES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("dining_tables");

/// Table registry errors
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Table not found: {0}")]
    NotFound(String),

    #[error("Table number {number} already exists for this restaurant")]
    DuplicateNumber { number: u32 },

    #[error("Table transition {from:?} -> {to:?} is not allowed")]
    InvalidTransition { from: TableStatus, to: TableStatus },

    #[error("Table {0} is occupied")]
    Occupied(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<crate::db::DbError> for TableError {
    fn from(err: crate::db::DbError) -> Self {
        TableError::Storage(err.to_string())
    }
}

pub type TableResult<T> = Result<T, TableError>;

/// Table registry over the shared database
#[derive(Clone)]
pub struct TableRegistry {
    db: Db,
}

impl TableRegistry {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Create a table; the number must be unique per restaurant.
    pub fn create(&self, payload: DiningTableCreate) -> TableResult<DiningTable> {
        let txn = self.db.begin_write()?;
        let existing: Vec<DiningTable> = db::scan_json_txn(&txn, TABLES_TABLE)?;
        if existing
            .iter()
            .any(|t| t.restaurant_id == payload.restaurant_id && t.number == payload.number)
        {
            return Err(TableError::DuplicateNumber {
                number: payload.number,
            });
        }

        let table = DiningTable {
            id: uuid::Uuid::new_v4().to_string(),
            restaurant_id: payload.restaurant_id,
            number: payload.number,
            status: TableStatus::Free,
            current_order_id: None,
            current_waiter_id: None,
            created_at: now_millis(),
        };
        db::insert_json_txn(&txn, TABLES_TABLE, &table.id, &table)?;
        txn.commit().map_err(crate::db::DbError::from)?;
        info!(table_id = %table.id, number = table.number, "Table created");
        Ok(table)
    }

    pub fn get(&self, id: &str) -> TableResult<DiningTable> {
        self.db
            .fetch_json(TABLES_TABLE, id)?
            .ok_or_else(|| TableError::NotFound(id.to_string()))
    }

    pub fn list(&self, restaurant_id: &str) -> TableResult<Vec<DiningTable>> {
        let mut tables: Vec<DiningTable> = self
            .db
            .scan_json(TABLES_TABLE)?
            .into_iter()
            .filter(|t: &DiningTable| t.restaurant_id == restaurant_id)
            .collect();
        tables.sort_by_key(|t| t.number);
        Ok(tables)
    }

    /// Load a table within an existing write transaction
    pub fn get_txn(&self, txn: &WriteTransaction, id: &str) -> TableResult<DiningTable> {
        db::fetch_json_txn(txn, TABLES_TABLE, id)?
            .ok_or_else(|| TableError::NotFound(id.to_string()))
    }

    /// FREE -> IN_USE, linking the table to its new order.
    ///
    /// Runs inside the order manager's transaction, so two concurrent
    /// openers cannot both pass the FREE check.
    pub fn occupy_txn(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
        order_id: &str,
        waiter_id: &str,
    ) -> TableResult<DiningTable> {
        let mut table = self.get_txn(txn, table_id)?;
        if table.status.is_occupied() {
            return Err(TableError::Occupied(table_id.to_string()));
        }
        table.status = TableStatus::InUse;
        table.current_order_id = Some(order_id.to_string());
        table.current_waiter_id = Some(waiter_id.to_string());
        db::insert_json_txn(txn, TABLES_TABLE, table_id, &table)?;
        Ok(table)
    }

    /// Release the table on a terminal order transition. Idempotent:
    /// freeing a FREE table is a no-op.
    pub fn free_txn(&self, txn: &WriteTransaction, table_id: &str) -> TableResult<DiningTable> {
        let mut table = self.get_txn(txn, table_id)?;
        if table.status == TableStatus::Free {
            return Ok(table);
        }
        table.status = TableStatus::Free;
        table.current_order_id = None;
        table.current_waiter_id = None;
        db::insert_json_txn(txn, TABLES_TABLE, table_id, &table)?;
        Ok(table)
    }

    /// IN_USE -> AWAITING_PAYMENT, set when checkout is initiated.
    pub fn await_payment(&self, table_id: &str) -> TableResult<DiningTable> {
        self.transition(table_id, TableStatus::AwaitingPayment)
    }

    /// AWAITING_PAYMENT -> IN_USE, when checkout is abandoned.
    pub fn resume_service(&self, table_id: &str) -> TableResult<DiningTable> {
        self.transition(table_id, TableStatus::InUse)
    }

    fn transition(&self, table_id: &str, to: TableStatus) -> TableResult<DiningTable> {
        let txn = self.db.begin_write()?;
        let mut table = self.get_txn(&txn, table_id)?;
        if !table.status.can_transition_to(to) {
            return Err(TableError::InvalidTransition {
                from: table.status,
                to,
            });
        }
        table.status = to;
        db::insert_json_txn(&txn, TABLES_TABLE, table_id, &table)?;
        txn.commit().map_err(crate::db::DbError::from)?;
        Ok(table)
    }

    /// Delete a table; only FREE tables may be removed.
    pub fn delete(&self, table_id: &str) -> TableResult<bool> {
        let txn = self.db.begin_write()?;
        let table = self.get_txn(&txn, table_id)?;
        if table.status.is_occupied() {
            return Err(TableError::Occupied(table_id.to_string()));
        }
        let existed = db::remove_txn(&txn, TABLES_TABLE, table_id)?;
        txn.commit().map_err(crate::db::DbError::from)?;
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TableRegistry {
        TableRegistry::new(Db::open_in_memory().unwrap())
    }

    fn create_payload(number: u32) -> DiningTableCreate {
        DiningTableCreate {
            restaurant_id: "rest-1".to_string(),
            number,
        }
    }

    #[test]
    fn duplicate_number_is_rejected() {
        let registry = registry();
        registry.create(create_payload(1)).unwrap();
        let result = registry.create(create_payload(1));
        assert!(matches!(
            result,
            Err(TableError::DuplicateNumber { number: 1 })
        ));

        // Same number in another restaurant is fine
        registry
            .create(DiningTableCreate {
                restaurant_id: "rest-2".to_string(),
                number: 1,
            })
            .unwrap();
    }

    #[test]
    fn occupy_links_order_and_rejects_second_opener() {
        let registry = registry();
        let table = registry.create(create_payload(4)).unwrap();

        let txn = registry.db.begin_write().unwrap();
        let occupied = registry
            .occupy_txn(&txn, &table.id, "order-1", "staff-1")
            .unwrap();
        assert_eq!(occupied.status, TableStatus::InUse);
        assert_eq!(occupied.current_order_id.as_deref(), Some("order-1"));

        let second = registry.occupy_txn(&txn, &table.id, "order-2", "staff-2");
        assert!(matches!(second, Err(TableError::Occupied(_))));
        txn.commit().unwrap();
    }

    #[test]
    fn free_is_idempotent() {
        let registry = registry();
        let table = registry.create(create_payload(4)).unwrap();

        let txn = registry.db.begin_write().unwrap();
        registry
            .occupy_txn(&txn, &table.id, "order-1", "staff-1")
            .unwrap();
        let freed = registry.free_txn(&txn, &table.id).unwrap();
        assert_eq!(freed.status, TableStatus::Free);
        assert_eq!(freed.current_order_id, None);
        assert_eq!(freed.current_waiter_id, None);

        // Second free is a no-op
        let freed_again = registry.free_txn(&txn, &table.id).unwrap();
        assert_eq!(freed_again.status, TableStatus::Free);
        txn.commit().unwrap();
    }

    #[test]
    fn awaiting_payment_requires_in_use() {
        let registry = registry();
        let table = registry.create(create_payload(4)).unwrap();

        // FREE -> AWAITING_PAYMENT is not in the transition table
        let result = registry.await_payment(&table.id);
        assert!(matches!(result, Err(TableError::InvalidTransition { .. })));

        let txn = registry.db.begin_write().unwrap();
        registry
            .occupy_txn(&txn, &table.id, "order-1", "staff-1")
            .unwrap();
        txn.commit().unwrap();

        let awaiting = registry.await_payment(&table.id).unwrap();
        assert_eq!(awaiting.status, TableStatus::AwaitingPayment);

        let resumed = registry.resume_service(&table.id).unwrap();
        assert_eq!(resumed.status, TableStatus::InUse);
    }

    #[test]
    fn occupied_table_cannot_be_deleted() {
        let registry = registry();
        let table = registry.create(create_payload(9)).unwrap();

        let txn = registry.db.begin_write().unwrap();
        registry
            .occupy_txn(&txn, &table.id, "order-1", "staff-1")
            .unwrap();
        txn.commit().unwrap();

        assert!(matches!(
            registry.delete(&table.id),
            Err(TableError::Occupied(_))
        ));
    }
}

//! redb-based storage layer for order event sourcing
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `order_events` | `(order_id, sequence)` | `OrderEvent` | Event stream (append-only) |
//! | `order_snapshots` | `order_id` | `OrderSnapshot` | Snapshot cache |
//! | `active_orders` | `order_id` | `()` | Active order index |
//! | `table_orders` | `table_id` | `order_id` | Open order per table |
//! | `processed_commands` | `command_id` | `()` | Idempotency check |
//! | `order_sequence` | `()` | `u64` | Global sequence |
//!
//! The `table_orders` index enforces "one non-terminal order per table":
//! it is written when an order opens and cleared on both terminal
//! transitions, inside the same transaction as the events.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::order::{OrderEvent, OrderSnapshot};
use thiserror::Error;

use crate::db::Db;

/// Event stream: key = (order_id, sequence), value = JSON-serialized OrderEvent
const EVENTS_TABLE: TableDefinition<(&str, u64), &[u8]> = TableDefinition::new("order_events");

/// Snapshots: key = order_id, value = JSON-serialized OrderSnapshot
const SNAPSHOTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("order_snapshots");

/// Active order index: key = order_id, value = empty (existence check)
const ACTIVE_ORDERS_TABLE: TableDefinition<&str, ()> = TableDefinition::new("active_orders");

/// Open order per table: key = table_id, value = order_id
const TABLE_ORDERS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("table_orders");

/// Processed commands: key = command_id, value = empty (idempotency)
const PROCESSED_COMMANDS_TABLE: TableDefinition<&str, ()> =
    TableDefinition::new("processed_commands");

/// Sequence counter: key = "seq", value = u64
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("order_sequence");

const SEQUENCE_KEY: &str = "seq";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Order storage backed by redb
///
/// Shares the server's single database file; redb's one-writer rule makes
/// every command's validate-apply-persist pipeline serial.
#[derive(Clone)]
pub struct OrderStorage {
    db: Db,
}

impl OrderStorage {
    /// Wrap the shared database handle and initialize the order tables.
    pub fn new(db: Db) -> StorageResult<Self> {
        let write_txn = db.begin_write().map_err(db_err)?;
        {
            let _ = write_txn.open_table(EVENTS_TABLE)?;
            let _ = write_txn.open_table(SNAPSHOTS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_ORDERS_TABLE)?;
            let _ = write_txn.open_table(TABLE_ORDERS_TABLE)?;
            let _ = write_txn.open_table(PROCESSED_COMMANDS_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(SEQUENCE_KEY)?.is_none() {
                seq_table.insert(SEQUENCE_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Open an in-memory storage (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Db::open_in_memory().map_err(|e| match e {
            crate::db::DbError::Database(err) => StorageError::Database(err),
            other => StorageError::OrderNotFound(other.to_string()),
        })?;
        Self::new(db)
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        self.db.begin_write().map_err(db_err)
    }

    fn database(&self) -> &Database {
        self.db.database()
    }

    // ========== Sequence Operations ==========

    /// Get current sequence (read-only)
    pub fn get_current_sequence(&self) -> StorageResult<u64> {
        let read_txn = self.database().begin_read()?;
        let table = read_txn.open_table(SEQUENCE_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    /// Set sequence number (within transaction)
    pub fn set_sequence(&self, txn: &WriteTransaction, sequence: u64) -> StorageResult<()> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        table.insert(SEQUENCE_KEY, sequence)?;
        Ok(())
    }

    // ========== Event Operations ==========

    /// Store an event (within transaction)
    pub fn store_event(&self, txn: &WriteTransaction, event: &OrderEvent) -> StorageResult<()> {
        let bytes = serde_json::to_vec(event)?;
        let mut table = txn.open_table(EVENTS_TABLE)?;
        table.insert((event.order_id.as_str(), event.sequence), bytes.as_slice())?;
        Ok(())
    }

    /// All events for an order, in sequence order
    pub fn get_events_for_order(&self, order_id: &str) -> StorageResult<Vec<OrderEvent>> {
        let read_txn = self.database().begin_read()?;
        let table = read_txn.open_table(EVENTS_TABLE)?;
        let mut events = Vec::new();
        for entry in table.range((order_id, 0u64)..=(order_id, u64::MAX))? {
            let (_, value) = entry?;
            events.push(serde_json::from_slice(value.value())?);
        }
        Ok(events)
    }

    // ========== Snapshot Operations ==========

    /// Store a snapshot (within transaction)
    pub fn store_snapshot(
        &self,
        txn: &WriteTransaction,
        snapshot: &OrderSnapshot,
    ) -> StorageResult<()> {
        let bytes = serde_json::to_vec(snapshot)?;
        let mut table = txn.open_table(SNAPSHOTS_TABLE)?;
        table.insert(snapshot.order_id.as_str(), bytes.as_slice())?;
        Ok(())
    }

    /// Load a snapshot within a write transaction
    pub fn load_snapshot_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<OrderSnapshot> {
        let table = txn.open_table(SNAPSHOTS_TABLE)?;
        let result = match table.get(order_id)? {
            Some(guard) => Ok(serde_json::from_slice(guard.value())?),
            None => Err(StorageError::OrderNotFound(order_id.to_string())),
        };
        result
    }

    /// Load a snapshot (read-only)
    pub fn get_snapshot(&self, order_id: &str) -> StorageResult<Option<OrderSnapshot>> {
        let read_txn = self.database().begin_read()?;
        let table = read_txn.open_table(SNAPSHOTS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All currently active (OPEN) order snapshots
    pub fn get_active_snapshots(&self) -> StorageResult<Vec<OrderSnapshot>> {
        let read_txn = self.database().begin_read()?;
        let active = read_txn.open_table(ACTIVE_ORDERS_TABLE)?;
        let snapshots = read_txn.open_table(SNAPSHOTS_TABLE)?;
        let mut result = Vec::new();
        for entry in active.iter()? {
            let (key, _) = entry?;
            if let Some(guard) = snapshots.get(key.value())? {
                result.push(serde_json::from_slice(guard.value())?);
            }
        }
        Ok(result)
    }

    // ========== Active Order Tracking ==========

    pub fn mark_order_active(&self, txn: &WriteTransaction, order_id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        table.insert(order_id, ())?;
        Ok(())
    }

    pub fn mark_order_inactive(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        table.remove(order_id)?;
        Ok(())
    }

    // ========== Table -> Open Order Index ==========

    /// Link a table to its open order (within transaction)
    pub fn link_table_order(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
        order_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(TABLE_ORDERS_TABLE)?;
        table.insert(table_id, order_id)?;
        Ok(())
    }

    /// Clear the table -> order link (within transaction)
    pub fn unlink_table_order(&self, txn: &WriteTransaction, table_id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(TABLE_ORDERS_TABLE)?;
        table.remove(table_id)?;
        Ok(())
    }

    /// The open order for a table, if any (within transaction)
    pub fn find_active_order_for_table_txn(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
    ) -> StorageResult<Option<String>> {
        let table = txn.open_table(TABLE_ORDERS_TABLE)?;
        let result = Ok(table.get(table_id)?.map(|guard| guard.value().to_string()));
        result
    }

    /// The open order for a table, if any (read-only)
    pub fn find_active_order_for_table(&self, table_id: &str) -> StorageResult<Option<String>> {
        let read_txn = self.database().begin_read()?;
        let table = read_txn.open_table(TABLE_ORDERS_TABLE)?;
        Ok(table.get(table_id)?.map(|guard| guard.value().to_string()))
    }

    // ========== Idempotency ==========

    /// Check if a command has been processed (read-only)
    pub fn is_command_processed(&self, command_id: &str) -> StorageResult<bool> {
        let read_txn = self.database().begin_read()?;
        let table = read_txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.is_some())
    }

    /// Check if a command has been processed (within transaction)
    pub fn is_command_processed_txn(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<bool> {
        let table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        let result = Ok(table.get(command_id)?.is_some());
        result
    }

    /// Mark a command as processed (within transaction)
    pub fn mark_command_processed(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        table.insert(command_id, ())?;
        Ok(())
    }
}

fn db_err(e: crate::db::DbError) -> StorageError {
    match e {
        crate::db::DbError::Database(err) => StorageError::Database(err),
        crate::db::DbError::Transaction(err) => StorageError::Transaction(err),
        other => StorageError::OrderNotFound(other.to_string()),
    }
}

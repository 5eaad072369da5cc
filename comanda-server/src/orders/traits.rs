//! Core traits for the command/event pipeline
//!
//! - [`CommandHandler`]: validates a command against current state and
//!   produces events; never mutates state itself.
//! - [`EventApplier`]: pure fold of one event into a snapshot.
//! - [`CommandContext`]: transaction-scoped view of storage plus the
//!   snapshots modified so far.

use async_trait::async_trait;
use redb::WriteTransaction;
use std::collections::HashMap;
use thiserror::Error;

use super::storage::{OrderStorage, StorageError};
use shared::order::{OrderEvent, OrderSnapshot};

/// Order command errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table {0} is already occupied")]
    TableOccupied(String),

    #[error("Order {order_id} is not open (status: {status})")]
    OrderNotOpen { order_id: String, status: String },

    #[error("Order {0} has no items")]
    EmptyOrder(String),

    #[error("A non-empty cancellation reason is required")]
    ReasonRequired,

    #[error("Line item not found: {0}")]
    LineItemNotFound(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for OrderError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::OrderNotFound(id) => OrderError::OrderNotFound(id),
            other => OrderError::Storage(other.to_string()),
        }
    }
}

/// Command metadata propagated onto every generated event
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub command_id: String,
    pub operator_id: String,
    pub operator_name: String,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
}

/// Transaction-scoped command context
///
/// Snapshots saved here shadow what is in storage, so a handler always sees
/// the effect of events applied earlier in the same command.
pub struct CommandContext<'a> {
    txn: &'a WriteTransaction,
    storage: &'a OrderStorage,
    sequence: u64,
    modified: HashMap<String, OrderSnapshot>,
}

impl<'a> CommandContext<'a> {
    pub fn new(txn: &'a WriteTransaction, storage: &'a OrderStorage, current_sequence: u64) -> Self {
        Self {
            txn,
            storage,
            sequence: current_sequence,
            modified: HashMap::new(),
        }
    }

    /// Allocate the next global sequence number
    pub fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    /// Highest sequence allocated so far
    pub fn current_sequence(&self) -> u64 {
        self.sequence
    }

    /// Load an order snapshot, preferring in-flight modifications
    pub fn load_snapshot(&self, order_id: &str) -> Result<OrderSnapshot, OrderError> {
        if let Some(snapshot) = self.modified.get(order_id) {
            return Ok(snapshot.clone());
        }
        Ok(self.storage.load_snapshot_txn(self.txn, order_id)?)
    }

    /// Save a modified snapshot into the context
    pub fn save_snapshot(&mut self, snapshot: OrderSnapshot) {
        self.modified.insert(snapshot.order_id.clone(), snapshot);
    }

    /// Snapshots modified during this command
    pub fn modified_snapshots(&self) -> impl Iterator<Item = &OrderSnapshot> {
        self.modified.values()
    }

    /// The open order for a table, if any
    pub fn find_active_order_for_table(
        &self,
        table_id: &str,
    ) -> Result<Option<String>, OrderError> {
        Ok(self
            .storage
            .find_active_order_for_table_txn(self.txn, table_id)?)
    }

    /// Underlying write transaction (for cross-module writes in the same
    /// atomic scope: table registry, ticket dispatch)
    pub fn txn(&self) -> &'a WriteTransaction {
        self.txn
    }
}

/// Command handler: validate + generate events
#[async_trait]
pub trait CommandHandler {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError>;
}

/// Event applier: pure function folding an event into a snapshot
#[enum_dispatch::enum_dispatch]
pub trait EventApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent);
}

//! OrdersManager - Core command processing and event generation
//!
//! # Command Flow
//!
//! ```text
//! execute_command(cmd)
//!     ├─ 1. Idempotency check (command_id)
//!     ├─ 2. Begin write transaction
//!     ├─ 3. Create CommandContext
//!     ├─ 4. Convert command to action and execute
//!     ├─ 5. Apply events to snapshots via EventApplier
//!     ├─ 6. Persist events and snapshots
//!     ├─ 7. Side effects in the same transaction:
//!     │      occupy/free table, dispatch/shrink/cascade-cancel tickets
//!     ├─ 8. Mark command processed
//!     ├─ 9. Commit transaction
//!     ├─ 10. Broadcast event(s)
//!     └─ 11. Return response
//! ```
//!
//! Every order and table mutation funnels through this pipeline; redb's
//! single-writer rule serializes commands, so the lost-update and
//! check-then-set races of a naive read-modify-write client cannot occur.

use std::path::Path;

use thiserror::Error;
use tokio::sync::broadcast;

use super::actions::{
    AddItemsAction, CancelOrderAction, CheckoutAction, CommandAction, RemoveItemAction,
    UpdateCustomerNameAction,
};
use super::appliers::EventAction;
use super::storage::{OrderStorage, StorageError};
use super::traits::{CommandContext, CommandHandler, CommandMetadata, EventApplier, OrderError};
use crate::db::Db;
use crate::tables::{TableError, TableRegistry};
use crate::tickets::{TicketDispatcher, TicketError};
use shared::order::{
    CommandError, CommandErrorCode, CommandResponse, EventPayload, OrderCommand,
    OrderCommandPayload, OrderEvent, OrderSnapshot,
};

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table is already occupied: {0}")]
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

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OrderError> for ManagerError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::OrderNotFound(id) => ManagerError::OrderNotFound(id),
            OrderError::TableNotFound(id) => ManagerError::TableNotFound(id),
            OrderError::TableOccupied(id) => ManagerError::TableOccupied(id),
            OrderError::OrderNotOpen { order_id, status } => {
                ManagerError::OrderNotOpen { order_id, status }
            }
            OrderError::EmptyOrder(id) => ManagerError::EmptyOrder(id),
            OrderError::ReasonRequired => ManagerError::ReasonRequired,
            OrderError::LineItemNotFound(id) => ManagerError::LineItemNotFound(id),
            OrderError::InvalidQuantity(q) => ManagerError::InvalidQuantity(q),
            OrderError::InvalidOperation(msg) => ManagerError::InvalidOperation(msg),
            OrderError::Storage(msg) => ManagerError::Internal(msg),
        }
    }
}

impl From<TableError> for ManagerError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::NotFound(id) => ManagerError::TableNotFound(id),
            TableError::Occupied(id) => ManagerError::TableOccupied(id),
            other => ManagerError::Internal(other.to_string()),
        }
    }
}

impl From<TicketError> for ManagerError {
    fn from(err: TicketError) -> Self {
        ManagerError::Internal(err.to_string())
    }
}

impl From<ManagerError> for CommandError {
    fn from(err: ManagerError) -> Self {
        let message = err.to_string();
        let code = match &err {
            ManagerError::Storage(e) => {
                tracing::error!(error = %e, "Storage error during command");
                CommandErrorCode::InternalError
            }
            ManagerError::OrderNotFound(_) => CommandErrorCode::OrderNotFound,
            ManagerError::TableNotFound(_) => CommandErrorCode::TableNotFound,
            ManagerError::TableOccupied(_) => CommandErrorCode::TableOccupied,
            ManagerError::OrderNotOpen { .. } => CommandErrorCode::OrderNotOpen,
            ManagerError::EmptyOrder(_) => CommandErrorCode::EmptyOrder,
            ManagerError::ReasonRequired => CommandErrorCode::ReasonRequired,
            ManagerError::LineItemNotFound(_) => CommandErrorCode::LineItemNotFound,
            ManagerError::InvalidQuantity(_) => CommandErrorCode::InvalidQuantity,
            ManagerError::InvalidOperation(_) => CommandErrorCode::InvalidOperation,
            ManagerError::Internal(_) => CommandErrorCode::InternalError,
        };
        CommandError::new(code, message)
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;

/// OrdersManager for command processing
///
/// The `epoch` field is a unique identifier generated on each startup;
/// clients use it to detect server restarts and refetch state.
pub struct OrdersManager {
    storage: OrderStorage,
    tables: TableRegistry,
    tickets: TicketDispatcher,
    event_tx: broadcast::Sender<OrderEvent>,
    epoch: String,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl OrdersManager {
    /// Create an OrdersManager over the shared database handle
    pub fn new(db: Db) -> ManagerResult<Self> {
        let storage = OrderStorage::new(db.clone())?;
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let epoch = uuid::Uuid::new_v4().to_string();
        tracing::info!(epoch = %epoch, "OrdersManager started with new epoch");
        Ok(Self {
            storage,
            tables: TableRegistry::new(db.clone()),
            tickets: TicketDispatcher::new(db),
            event_tx,
            epoch,
        })
    }

    /// Open the manager on a database file path
    pub fn open(path: impl AsRef<Path>) -> ManagerResult<Self> {
        let db = Db::open(path)
            .map_err(|e| ManagerError::Internal(format!("failed to open database: {}", e)))?;
        Self::new(db)
    }

    /// Get the server epoch (unique instance ID)
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.event_tx.subscribe()
    }

    /// Get the underlying storage
    pub fn storage(&self) -> &OrderStorage {
        &self.storage
    }

    /// Load an order snapshot
    pub fn get_snapshot(&self, order_id: &str) -> ManagerResult<Option<OrderSnapshot>> {
        Ok(self.storage.get_snapshot(order_id)?)
    }

    /// All currently open orders
    pub fn active_orders(&self) -> ManagerResult<Vec<OrderSnapshot>> {
        Ok(self.storage.get_active_snapshots()?)
    }

    /// Event history for an order
    pub fn order_events(&self, order_id: &str) -> ManagerResult<Vec<OrderEvent>> {
        Ok(self.storage.get_events_for_order(order_id)?)
    }

    /// The open order for a table, if any
    pub fn active_order_for_table(&self, table_id: &str) -> ManagerResult<Option<String>> {
        Ok(self.storage.find_active_order_for_table(table_id)?)
    }

    /// Execute a command and return the response
    pub fn execute_command(&self, cmd: OrderCommand) -> CommandResponse {
        let command_id = cmd.command_id.clone();
        match self.process_command(cmd) {
            Ok((response, events)) => {
                // Broadcast events after successful commit
                for event in events {
                    let _ = self.event_tx.send(event);
                }
                response
            }
            Err(err) => CommandResponse::error(command_id, err.into()),
        }
    }

    /// Process command and return response with events
    fn process_command(
        &self,
        cmd: OrderCommand,
    ) -> ManagerResult<(CommandResponse, Vec<OrderEvent>)> {
        tracing::info!(command_id = %cmd.command_id, payload = ?cmd.payload, "Processing command");

        // 1. Idempotency check (before transaction)
        if self.storage.is_command_processed(&cmd.command_id)? {
            tracing::warn!(command_id = %cmd.command_id, "Duplicate command");
            return Ok((CommandResponse::duplicate(cmd.command_id), vec![]));
        }

        // 2. Begin write transaction
        let txn = self.storage.begin_write()?;

        // Double-check idempotency within the transaction
        if self.storage.is_command_processed_txn(&txn, &cmd.command_id)? {
            return Ok((CommandResponse::duplicate(cmd.command_id), vec![]));
        }

        // 3. Create context and metadata
        let current_sequence = self.storage.get_current_sequence()?;
        let mut ctx = CommandContext::new(&txn, &self.storage, current_sequence);
        let metadata = CommandMetadata {
            command_id: cmd.command_id.clone(),
            operator_id: cmd.operator_id.clone(),
            operator_name: cmd.operator_name.clone(),
            timestamp: cmd.timestamp,
        };

        // 4. Convert to action and execute
        // AddItems resolves its table inside the transaction, so the
        // occupancy check cannot race with a concurrent opener.
        let ticket_id = uuid::Uuid::new_v4().to_string();
        let action = match &cmd.payload {
            OrderCommandPayload::AddItems { table_id, items } => {
                let table = self.tables.get_txn(&txn, table_id).map_err(|e| match e {
                    TableError::NotFound(id) => ManagerError::TableNotFound(id),
                    other => ManagerError::from(other),
                })?;
                CommandAction::AddItems(AddItemsAction {
                    table,
                    items: items.clone(),
                    ticket_id: ticket_id.clone(),
                })
            }
            OrderCommandPayload::RemoveItem {
                order_id,
                line_id,
                reason,
            } => CommandAction::RemoveItem(RemoveItemAction {
                order_id: order_id.clone(),
                line_id: line_id.clone(),
                reason: reason.clone(),
            }),
            OrderCommandPayload::Checkout {
                order_id,
                payment_method,
                waive_service_fee,
            } => CommandAction::Checkout(CheckoutAction {
                order_id: order_id.clone(),
                payment_method: *payment_method,
                waive_service_fee: *waive_service_fee,
            }),
            OrderCommandPayload::CancelOrder { order_id, reason } => {
                CommandAction::CancelOrder(CancelOrderAction {
                    order_id: order_id.clone(),
                    reason: reason.clone(),
                })
            }
            OrderCommandPayload::UpdateCustomerName {
                order_id,
                customer_name,
            } => CommandAction::UpdateCustomerName(UpdateCustomerNameAction {
                order_id: order_id.clone(),
                customer_name: customer_name.clone(),
            }),
        };

        let events = futures::executor::block_on(action.execute(&mut ctx, &metadata))
            .map_err(ManagerError::from)?;

        // 5. Apply events to snapshots
        for event in &events {
            let mut snapshot = ctx
                .load_snapshot(&event.order_id)
                .unwrap_or_else(|_| OrderSnapshot::new(event.order_id.clone()));
            let applier: EventAction = event.into();
            applier.apply(&mut snapshot, event);
            ctx.save_snapshot(snapshot);
        }

        // 6. Persist events
        for event in &events {
            self.storage.store_event(&txn, event)?;
        }

        // 7. Persist snapshots and maintain the active-order index
        for snapshot in ctx.modified_snapshots() {
            self.storage.store_snapshot(&txn, snapshot)?;
            if snapshot.is_open() {
                self.storage.mark_order_active(&txn, &snapshot.order_id)?;
            } else {
                self.storage.mark_order_inactive(&txn, &snapshot.order_id)?;
            }
        }

        // 8. Side effects in the same transaction: table registry and
        //    kitchen tickets stay consistent with the order events.
        let mut dispatched_ticket = None;
        for event in &events {
            match &event.payload {
                EventPayload::OrderOpened {
                    table_id,
                    waiter_id,
                    ..
                } => {
                    self.tables
                        .occupy_txn(&txn, table_id, &event.order_id, waiter_id)?;
                    self.storage
                        .link_table_order(&txn, table_id, &event.order_id)?;
                }
                EventPayload::ItemsAdded { items, ticket_id } => {
                    let snapshot = ctx.load_snapshot(&event.order_id).map_err(|e| {
                        ManagerError::Internal(format!("snapshot vanished mid-command: {}", e))
                    })?;
                    let ticket = TicketDispatcher::build_ticket(ticket_id, &snapshot, items);
                    self.tickets.dispatch_txn(&txn, &ticket)?;
                    dispatched_ticket = Some(ticket_id.clone());
                }
                EventPayload::ItemRemoved { line_id, .. } => {
                    let found = self.tickets.remove_line_txn(
                        &txn,
                        &event.order_id,
                        line_id,
                        event.timestamp,
                    )?;
                    if !found {
                        tracing::warn!(order_id = %event.order_id, line_id = %line_id,
                            "No active ticket entry for removed line");
                    }
                }
                EventPayload::OrderPaid { .. } => {
                    let snapshot = ctx.load_snapshot(&event.order_id).map_err(|e| {
                        ManagerError::Internal(format!("snapshot vanished mid-command: {}", e))
                    })?;
                    self.storage.unlink_table_order(&txn, &snapshot.table_id)?;
                    self.tables.free_txn(&txn, &snapshot.table_id)?;
                }
                EventPayload::OrderCancelled { .. } => {
                    let snapshot = ctx.load_snapshot(&event.order_id).map_err(|e| {
                        ManagerError::Internal(format!("snapshot vanished mid-command: {}", e))
                    })?;
                    self.tickets
                        .cancel_for_order_txn(&txn, &event.order_id, event.timestamp)?;
                    self.storage.unlink_table_order(&txn, &snapshot.table_id)?;
                    self.tables.free_txn(&txn, &snapshot.table_id)?;
                }
                EventPayload::CustomerRenamed { .. } => {}
            }
        }

        // 9. Update sequence counter
        let max_sequence = events
            .iter()
            .map(|e| e.sequence)
            .max()
            .unwrap_or(current_sequence);
        if max_sequence > current_sequence {
            self.storage.set_sequence(&txn, max_sequence)?;
        }

        // 10. Mark command processed
        self.storage.mark_command_processed(&txn, &cmd.command_id)?;

        // 11. Commit
        txn.commit().map_err(StorageError::from)?;

        let order_id = events.first().map(|e| e.order_id.clone());
        tracing::info!(
            command_id = %cmd.command_id,
            order_id = ?order_id,
            events = events.len(),
            "Command committed"
        );

        Ok((
            CommandResponse::success(cmd.command_id, order_id, dispatched_ticket),
            events,
        ))
    }
}

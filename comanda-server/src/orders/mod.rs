//! Order Event Sourcing Module
//!
//! - **manager**: Core OrdersManager for command processing and event generation
//! - **storage**: redb-based persistence for events, snapshots, and indices
//! - **actions**: command validation, one handler per command
//! - **appliers**: pure event folds into snapshots
//! - **money**: decimal-precise totals
//!
//! # Data Flow
//!
//! 1. API handler builds an OrderCommand
//! 2. OrdersManager validates and processes it
//! 3. OrderEvents are generated with global sequence numbers
//! 4. Events, snapshots, table state and kitchen tickets are persisted in
//!    one redb transaction
//! 5. Events are broadcast to subscribers
//! 6. CommandResponse is returned to the caller

pub mod actions;
pub mod traits;
pub mod appliers;
pub mod manager;
pub mod money;
pub mod reducer;
pub mod storage;

#[cfg(test)]
pub mod testing;

// Re-exports
pub use manager::{ManagerError, ManagerResult, OrdersManager};
pub use storage::OrderStorage;

// Re-export shared types for convenience
pub use shared::order::{
    CommandError, CommandErrorCode, CommandResponse, EventPayload, OrderCommand,
    OrderCommandPayload, OrderEvent, OrderEventType, OrderSnapshot, OrderStatus,
};

//! Shared types for the Comanda POS
//!
//! Entity models, order commands/events/snapshots, and the typed status
//! enums used by both the server and its clients.

pub mod models;
pub mod order;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Order re-exports (for convenient access)
pub use order::{
    CommandError, CommandErrorCode, CommandResponse, OrderCommand, OrderCommandPayload,
    OrderEvent, OrderEventType, OrderSnapshot, OrderStatus,
};

//! Order types for event sourcing
//!
//! - **command**: client intents, validated by the server
//! - **event**: immutable facts recorded after command processing
//! - **snapshot**: order state folded from the event stream
//! - **types**: line items, payment methods, command responses

mod command;
mod event;
mod snapshot;
mod types;

pub use command::{OrderCommand, OrderCommandPayload};
pub use event::{EventPayload, OrderEvent, OrderEventType};
pub use snapshot::{CancellationInfo, OrderSnapshot, OrderStatus, PaymentInfo};
pub use types::{
    AddonSnapshot, CommandError, CommandErrorCode, CommandResponse, LineItemInput,
    LineItemSnapshot, PaymentMethod, CUSTOMER_WAITER_ID,
};

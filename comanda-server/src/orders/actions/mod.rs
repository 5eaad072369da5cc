//! Command action implementations
//!
//! Each action implements the `CommandHandler` trait and handles one
//! specific command type. Actions validate against the current snapshot and
//! emit events; they never mutate state themselves.

use async_trait::async_trait;

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{OrderEvent, OrderSnapshot};

mod add_items;
mod cancel_order;
mod checkout;
mod remove_item;
mod update_customer_name;

pub use add_items::AddItemsAction;
pub use cancel_order::CancelOrderAction;
pub use checkout::CheckoutAction;
pub use remove_item::RemoveItemAction;
pub use update_customer_name::UpdateCustomerNameAction;

/// CommandAction enum - dispatches to concrete action implementations
pub enum CommandAction {
    AddItems(AddItemsAction),
    RemoveItem(RemoveItemAction),
    Checkout(CheckoutAction),
    CancelOrder(CancelOrderAction),
    UpdateCustomerName(UpdateCustomerNameAction),
}

#[async_trait]
impl CommandHandler for CommandAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        match self {
            CommandAction::AddItems(action) => action.execute(ctx, metadata).await,
            CommandAction::RemoveItem(action) => action.execute(ctx, metadata).await,
            CommandAction::Checkout(action) => action.execute(ctx, metadata).await,
            CommandAction::CancelOrder(action) => action.execute(ctx, metadata).await,
            CommandAction::UpdateCustomerName(action) => action.execute(ctx, metadata).await,
        }
    }
}

/// Require an OPEN order; every mutation goes through this gate.
pub(crate) fn validate_open(snapshot: &OrderSnapshot) -> Result<(), OrderError> {
    if snapshot.is_open() {
        return Ok(());
    }
    Err(OrderError::OrderNotOpen {
        order_id: snapshot.order_id.clone(),
        status: format!("{:?}", snapshot.status).to_uppercase(),
    })
}

//! Order handlers
//!
//! Handlers translate HTTP requests into `OrderCommand`s, run them through
//! the manager (which serializes all order mutations), and return the
//! refreshed snapshot.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::CurrentStaff;
use crate::billing::{self, PayerShare};
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use shared::models::{ActivityAction, KitchenTicket};
use shared::order::{
    CommandError, CommandErrorCode, LineItemInput, OrderCommand, OrderCommandPayload, OrderEvent,
    OrderSnapshot, PaymentMethod,
};

#[derive(Debug, Deserialize)]
pub struct AddItemsRequest {
    pub table_id: String,
    pub items: Vec<LineItemInput>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub line_id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub waive_service_fee: bool,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EqualSplitRequest {
    #[validate(range(min = 2, max = 10))]
    pub payers: usize,
    #[serde(default)]
    pub waive_service_fee: bool,
}

#[derive(Debug, Deserialize)]
pub struct ManualSplitRequest {
    pub amounts: Vec<f64>,
    #[serde(default)]
    pub waive_service_fee: bool,
}

#[derive(Debug, Serialize)]
pub struct ManualSplitResponse {
    /// `final_total - Σ(amounts)`; negative when the amounts overshoot
    pub remainder: f64,
    /// Payment may be confirmed only when the remainder is exactly zero
    pub balanced: bool,
}

/// Build and execute a command for the current staff member.
fn run_command(
    state: &ServerState,
    staff: &CurrentStaff,
    payload: OrderCommandPayload,
) -> AppResult<shared::order::CommandResponse> {
    let cmd = OrderCommand {
        command_id: uuid::Uuid::new_v4().to_string(),
        restaurant_id: staff.restaurant_id.clone(),
        operator_id: staff.staff_id.clone(),
        operator_name: staff.name.clone(),
        timestamp: crate::utils::now_millis(),
        payload,
    };
    let response = state.orders.execute_command(cmd);
    if !response.success {
        let error = response.error.unwrap_or_else(|| {
            CommandError::new(CommandErrorCode::InternalError, "command failed")
        });
        return Err(error.into());
    }
    Ok(response)
}

/// Load a snapshot, hiding orders of other restaurants.
fn load_scoped(
    state: &ServerState,
    staff: &CurrentStaff,
    order_id: &str,
) -> AppResult<OrderSnapshot> {
    let snapshot = state
        .orders
        .get_snapshot(order_id)
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_id)))?;
    if snapshot.restaurant_id != staff.restaurant_id {
        return Err(AppError::not_found(format!("Order {} not found", order_id)));
    }
    Ok(snapshot)
}

/// The final payable amount a split divides: subtotal alone when the
/// service fee is waived, subtotal plus fee otherwise.
fn final_total(snapshot: &OrderSnapshot, waive_service_fee: bool) -> f64 {
    if waive_service_fee {
        snapshot.subtotal
    } else {
        snapshot.total
    }
}

/// GET /api/orders/active
pub async fn list_active(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
) -> AppResult<Json<Vec<OrderSnapshot>>> {
    let mut orders: Vec<OrderSnapshot> = state
        .orders
        .active_orders()
        .map_err(|e| AppError::database(e.to_string()))?
        .into_iter()
        .filter(|o| o.restaurant_id == staff.restaurant_id)
        .collect();
    orders.sort_by_key(|o| o.created_at);
    Ok(Json(orders))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderSnapshot>> {
    Ok(Json(load_scoped(&state, &staff, &id)?))
}

/// GET /api/orders/:id/events
pub async fn list_events(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<OrderEvent>>> {
    load_scoped(&state, &staff, &id)?;
    let events = state
        .orders
        .order_events(&id)
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(events))
}

/// GET /api/orders/:id/tickets
pub async fn list_tickets(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<KitchenTicket>>> {
    load_scoped(&state, &staff, &id)?;
    Ok(Json(state.tickets.list_for_order(&id)?))
}

/// POST /api/orders/items - add a batch of items to the table's open
/// order, opening one if the table is free
pub async fn add_items(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Json(req): Json<AddItemsRequest>,
) -> AppResult<Json<OrderSnapshot>> {
    let opens_order = state
        .orders
        .active_order_for_table(&req.table_id)
        .map_err(|e| AppError::database(e.to_string()))?
        .is_none();

    let response = run_command(
        &state,
        &staff,
        OrderCommandPayload::AddItems {
            table_id: req.table_id,
            items: req.items,
        },
    )?;
    let order_id = response
        .order_id
        .ok_or_else(|| AppError::internal("command response missing order id"))?;

    if opens_order {
        state.activity.record(
            &staff.restaurant_id,
            &staff.staff_id,
            &staff.name,
            ActivityAction::OrderOpened,
            "Order",
            &order_id,
            None,
        );
    }

    Ok(Json(load_scoped(&state, &staff, &order_id)?))
}

/// POST /api/orders/:id/remove-item
pub async fn remove_item(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
    Json(req): Json<RemoveItemRequest>,
) -> AppResult<Json<OrderSnapshot>> {
    let before = load_scoped(&state, &staff, &id)?;
    let removed_label = before
        .find_item(&req.line_id)
        .map(|item| format!("{} ({}x)", item.name, item.quantity));

    run_command(
        &state,
        &staff,
        OrderCommandPayload::RemoveItem {
            order_id: id.clone(),
            line_id: req.line_id,
            reason: req.reason,
        },
    )?;

    state.activity.record(
        &staff.restaurant_id,
        &staff.staff_id,
        &staff.name,
        ActivityAction::ItemRemoved,
        "Order",
        &id,
        removed_label.map(|label| format!("Item removed: {}", label)),
    );

    Ok(Json(load_scoped(&state, &staff, &id)?))
}

/// POST /api/orders/:id/checkout
pub async fn checkout(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
    Json(req): Json<CheckoutRequest>,
) -> AppResult<Json<OrderSnapshot>> {
    load_scoped(&state, &staff, &id)?;
    run_command(
        &state,
        &staff,
        OrderCommandPayload::Checkout {
            order_id: id.clone(),
            payment_method: req.payment_method,
            waive_service_fee: req.waive_service_fee,
        },
    )?;

    let snapshot = load_scoped(&state, &staff, &id)?;
    state.activity.record(
        &staff.restaurant_id,
        &staff.staff_id,
        &staff.name,
        ActivityAction::OrderPaid,
        "Order",
        &id,
        Some(format!("Total: {:.2}", snapshot.total)),
    );
    Ok(Json(snapshot))
}

/// POST /api/orders/:id/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
    Json(req): Json<CancelRequest>,
) -> AppResult<Json<OrderSnapshot>> {
    load_scoped(&state, &staff, &id)?;
    run_command(
        &state,
        &staff,
        OrderCommandPayload::CancelOrder {
            order_id: id.clone(),
            reason: req.reason.clone(),
        },
    )?;

    state.activity.record(
        &staff.restaurant_id,
        &staff.staff_id,
        &staff.name,
        ActivityAction::OrderCancelled,
        "Order",
        &id,
        Some(format!("Reason: {}", req.reason.trim())),
    );

    Ok(Json(load_scoped(&state, &staff, &id)?))
}

/// POST /api/orders/:id/split/equal
pub async fn split_equal(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
    Json(req): Json<EqualSplitRequest>,
) -> AppResult<Json<Vec<PayerShare>>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let snapshot = load_scoped(&state, &staff, &id)?;
    if !snapshot.is_open() {
        return Err(AppError::invalid_state("Order is not open"));
    }
    let shares = billing::equal_split(final_total(&snapshot, req.waive_service_fee), req.payers)?;
    Ok(Json(shares))
}

/// POST /api/orders/:id/split/manual - live remainder as the operator
/// edits the per-payer amounts
pub async fn split_manual(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
    Json(req): Json<ManualSplitRequest>,
) -> AppResult<Json<ManualSplitResponse>> {
    let snapshot = load_scoped(&state, &staff, &id)?;
    if !snapshot.is_open() {
        return Err(AppError::invalid_state("Order is not open"));
    }
    let total = final_total(&snapshot, req.waive_service_fee);
    let remainder = billing::manual_split_remainder(total, &req.amounts);
    let balanced = billing::validate_manual_split(total, &req.amounts).is_ok();
    Ok(Json(ManualSplitResponse {
        remainder,
        balanced,
    }))
}

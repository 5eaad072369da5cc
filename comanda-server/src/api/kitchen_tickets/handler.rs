//! Kitchen ticket handlers
//!
//! The kitchen board lists tickets and advances them forward
//! (NEW -> IN_PREP -> READY -> DELIVERED); cancellation only ever arrives
//! through an order cancel. Deleting is history cleanup for terminal
//! tickets.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use shared::models::{KitchenTicket, TicketStatus};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Restrict to one order's tickets
    pub order_id: Option<String>,
    /// Include delivered/cancelled tickets (default: active only)
    #[serde(default)]
    pub include_terminal: bool,
    /// Created-at lower bound, Unix milliseconds (history browsing)
    pub since: Option<i64>,
    /// Created-at upper bound, Unix milliseconds
    pub until: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: TicketStatus,
}

fn scoped(ticket: KitchenTicket, staff: &CurrentStaff) -> AppResult<KitchenTicket> {
    if ticket.restaurant_id != staff.restaurant_id {
        return Err(AppError::not_found(format!(
            "Kitchen ticket {} not found",
            ticket.id
        )));
    }
    Ok(ticket)
}

/// GET /api/kitchen-tickets
pub async fn list(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<KitchenTicket>>> {
    let mut tickets = match &query.order_id {
        Some(order_id) => state.tickets.list_for_order(order_id)?,
        None => state.tickets.list_for_restaurant(&staff.restaurant_id)?,
    };
    tickets.retain(|t| t.restaurant_id == staff.restaurant_id);
    if !query.include_terminal {
        tickets.retain(|t| !t.status.is_terminal());
    }
    if let Some(since) = query.since {
        tickets.retain(|t| t.created_at >= since);
    }
    if let Some(until) = query.until {
        tickets.retain(|t| t.created_at < until);
    }
    Ok(Json(tickets))
}

/// GET /api/kitchen-tickets/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
) -> AppResult<Json<KitchenTicket>> {
    let ticket = scoped(state.tickets.get(&id)?, &staff)?;
    Ok(Json(ticket))
}

/// PUT /api/kitchen-tickets/:id/status
pub async fn set_status(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<Json<KitchenTicket>> {
    scoped(state.tickets.get(&id)?, &staff)?;
    Ok(Json(state.tickets.set_status(&id, req.status)?))
}

/// DELETE /api/kitchen-tickets/:id
pub async fn delete(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    scoped(state.tickets.get(&id)?, &staff)?;
    Ok(Json(state.tickets.delete(&id)?))
}

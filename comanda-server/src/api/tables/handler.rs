//! Table registry handlers
//!
//! All routes are restaurant-scoped through the caller's token. Creating
//! and deleting tables is admin-only; occupancy state otherwise changes
//! only through the order pipeline, except for the AWAITING_PAYMENT toggle
//! set when a waiter opens the checkout dialog.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use shared::models::{DiningTable, DiningTableCreate, StaffRole};

#[derive(Debug, Deserialize)]
pub struct CreateTableRequest {
    pub number: u32,
}

/// GET /api/tables
pub async fn list(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
) -> AppResult<Json<Vec<DiningTable>>> {
    Ok(Json(state.tables.list(&staff.restaurant_id)?))
}

/// GET /api/tables/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    let table = state.tables.get(&id)?;
    if table.restaurant_id != staff.restaurant_id {
        return Err(AppError::not_found(format!("Table {} not found", id)));
    }
    Ok(Json(table))
}

/// POST /api/tables
pub async fn create(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Json(req): Json<CreateTableRequest>,
) -> AppResult<Json<DiningTable>> {
    staff.require_role(StaffRole::Admin)?;
    let table = state.tables.create(DiningTableCreate {
        restaurant_id: staff.restaurant_id,
        number: req.number,
    })?;
    Ok(Json(table))
}

/// POST /api/tables/:id/await-payment - checkout dialog opened
pub async fn await_payment(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    let table = state.tables.get(&id)?;
    if table.restaurant_id != staff.restaurant_id {
        return Err(AppError::not_found(format!("Table {} not found", id)));
    }
    Ok(Json(state.tables.await_payment(&id)?))
}

/// POST /api/tables/:id/resume - checkout abandoned
pub async fn resume(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    let table = state.tables.get(&id)?;
    if table.restaurant_id != staff.restaurant_id {
        return Err(AppError::not_found(format!("Table {} not found", id)));
    }
    Ok(Json(state.tables.resume_service(&id)?))
}

/// DELETE /api/tables/:id
pub async fn delete(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    staff.require_role(StaffRole::Admin)?;
    let table = state.tables.get(&id)?;
    if table.restaurant_id != staff.restaurant_id {
        return Err(AppError::not_found(format!("Table {} not found", id)));
    }
    Ok(Json(state.tables.delete(&id)?))
}

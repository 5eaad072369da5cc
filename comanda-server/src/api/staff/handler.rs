//! Staff administration handlers
//!
//! PINs arrive raw in create/update payloads and are hashed before they
//! touch storage; responses never include the hash
//! (`Staff::pin_hash` is `skip_serializing`).

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::auth::{pin, CurrentStaff};
use crate::core::ServerState;
use crate::db::repository::StaffRepository;
use crate::utils::{AppError, AppResult};
use shared::models::{Staff, StaffCreate, StaffRole, StaffUpdate};

#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    pub login_id: String,
    pub pin: String,
    pub role: StaffRole,
}

/// GET /api/staff
pub async fn list(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
) -> AppResult<Json<Vec<Staff>>> {
    staff.require_role(StaffRole::Admin)?;
    let members = StaffRepository::new(state.db.clone()).find_by_restaurant(&staff.restaurant_id)?;
    Ok(Json(members))
}

/// POST /api/staff
pub async fn create(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Json(req): Json<CreateStaffRequest>,
) -> AppResult<Json<Staff>> {
    staff.require_role(StaffRole::Admin)?;
    if req.name.trim().is_empty() || req.login_id.trim().is_empty() {
        return Err(AppError::validation("Name and login id are required"));
    }
    if !pin::validate_pin_format(&req.pin) {
        return Err(AppError::validation("PIN must be exactly 4 digits"));
    }
    let repo = StaffRepository::new(state.db.clone());
    if repo
        .find_by_login(&staff.restaurant_id, &req.login_id)?
        .is_some()
    {
        return Err(AppError::conflict(format!(
            "Login id {} already exists",
            req.login_id
        )));
    }
    let member = repo.create(StaffCreate {
        restaurant_id: staff.restaurant_id,
        name: req.name,
        login_id: req.login_id,
        pin: req.pin,
        role: req.role,
    })?;
    Ok(Json(member))
}

/// PUT /api/staff/:id
pub async fn update(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
    Json(payload): Json<StaffUpdate>,
) -> AppResult<Json<Staff>> {
    staff.require_role(StaffRole::Admin)?;
    if let Some(raw_pin) = &payload.pin {
        if !pin::validate_pin_format(raw_pin) {
            return Err(AppError::validation("PIN must be exactly 4 digits"));
        }
    }
    let repo = StaffRepository::new(state.db.clone());
    let member = repo
        .find_by_id(&id)?
        .ok_or_else(|| AppError::not_found(format!("Staff {} not found", id)))?;
    if member.restaurant_id != staff.restaurant_id {
        return Err(AppError::not_found(format!("Staff {} not found", id)));
    }
    Ok(Json(repo.update(&id, payload)?))
}

/// DELETE /api/staff/:id
pub async fn delete(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    staff.require_role(StaffRole::Admin)?;
    let repo = StaffRepository::new(state.db.clone());
    let member = repo
        .find_by_id(&id)?
        .ok_or_else(|| AppError::not_found(format!("Staff {} not found", id)))?;
    if member.restaurant_id != staff.restaurant_id {
        return Err(AppError::not_found(format!("Staff {} not found", id)));
    }
    if member.id == staff.staff_id {
        return Err(AppError::validation("You cannot delete your own account"));
    }
    Ok(Json(repo.delete(&id)?))
}

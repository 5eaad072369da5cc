//! Restaurant handlers

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{pin, CurrentStaff};
use crate::core::ServerState;
use crate::db::repository::{RestaurantRepository, StaffRepository};
use crate::utils::{AppError, AppResult};
use shared::models::{Restaurant, RestaurantCreate, Staff, StaffCreate, StaffRole};

const SUPER_ADMIN_HEADER: &str = "x-super-admin-token";

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub owner_email: String,
    pub admin_name: String,
    pub admin_login_id: String,
    /// Raw 4-digit PIN for the first admin account
    pub admin_pin: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub restaurant: Restaurant,
    pub admin: Staff,
}

#[derive(Debug, Deserialize)]
pub struct BlockRequest {
    pub reason: String,
}

/// Check the super-admin token header. A server without the token
/// configured has no super-admin surface at all.
fn require_super_admin(state: &ServerState, headers: &HeaderMap) -> AppResult<()> {
    let expected = state
        .config
        .super_admin_token
        .as_deref()
        .ok_or_else(|| AppError::forbidden("Super-admin surface is disabled"))?;
    let provided = headers
        .get(SUPER_ADMIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;
    if provided != expected {
        return Err(AppError::forbidden("Invalid super-admin token"));
    }
    Ok(())
}

/// POST /api/restaurants/signup
pub async fn signup(
    State(state): State<ServerState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    if req.admin_name.trim().is_empty() || req.admin_login_id.trim().is_empty() {
        return Err(AppError::validation("Admin name and login id are required"));
    }
    if !pin::validate_pin_format(&req.admin_pin) {
        return Err(AppError::validation("PIN must be exactly 4 digits"));
    }

    let restaurant = RestaurantRepository::new(state.db.clone()).create(RestaurantCreate {
        name: req.name,
        owner_email: req.owner_email,
    })?;
    let admin = StaffRepository::new(state.db.clone()).create(StaffCreate {
        restaurant_id: restaurant.id.clone(),
        name: req.admin_name,
        login_id: req.admin_login_id,
        pin: req.admin_pin,
        role: StaffRole::Admin,
    })?;

    tracing::info!(restaurant_id = %restaurant.id, "Restaurant signed up");
    Ok(Json(SignupResponse { restaurant, admin }))
}

/// GET /api/restaurants/me
pub async fn me(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
) -> AppResult<Json<Restaurant>> {
    let restaurant = RestaurantRepository::new(state.db.clone())
        .find_by_id(&staff.restaurant_id)?
        .ok_or_else(|| AppError::not_found("Restaurant not found"))?;
    Ok(Json(restaurant))
}

/// GET /api/admin/restaurants
pub async fn list_all(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> AppResult<Json<Vec<Restaurant>>> {
    require_super_admin(&state, &headers)?;
    Ok(Json(RestaurantRepository::new(state.db.clone()).find_all()?))
}

/// POST /api/admin/restaurants/:id/block
pub async fn block(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<BlockRequest>,
) -> AppResult<Json<Restaurant>> {
    require_super_admin(&state, &headers)?;
    if req.reason.trim().is_empty() {
        return Err(AppError::validation("A blocking reason is required"));
    }
    let restaurant = RestaurantRepository::new(state.db.clone()).block(&id, req.reason)?;
    tracing::warn!(restaurant_id = %id, "Restaurant blocked");
    Ok(Json(restaurant))
}

/// POST /api/admin/restaurants/:id/unblock
pub async fn unblock(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> AppResult<Json<Restaurant>> {
    require_super_admin(&state, &headers)?;
    let restaurant = RestaurantRepository::new(state.db.clone()).unblock(&id)?;
    tracing::info!(restaurant_id = %id, "Restaurant unblocked");
    Ok(Json(restaurant))
}

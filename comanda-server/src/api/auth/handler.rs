//! Authentication handlers
//!
//! Staff log in with their restaurant, login id and 4-digit PIN. A
//! successful login returns a JWT carrying id, role and restaurant. The
//! error message never reveals whether the login id or the PIN was wrong.

use std::time::Duration;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{pin, CurrentStaff};
use crate::core::ServerState;
use crate::db::repository::{RestaurantRepository, StaffRepository};
use crate::utils::{AppError, AppResult};
use shared::models::{ActivityAction, StaffRole};

/// Fixed delay applied to every login attempt, so response timing does not
/// leak whether the login id exists.
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub restaurant_id: String,
    #[validate(length(min = 1, max = 64))]
    pub login_id: String,
    #[validate(length(equal = 4))]
    pub pin: String,
}

#[derive(Debug, Serialize)]
pub struct StaffInfo {
    pub id: String,
    pub name: String,
    pub role: StaffRole,
    pub restaurant_id: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub staff: StaffInfo,
}

fn invalid_credentials() -> AppError {
    AppError::validation("Invalid login or PIN")
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    req.validate()
        .map_err(|_| invalid_credentials())?;
    if !pin::validate_pin_format(&req.pin) {
        return Err(invalid_credentials());
    }

    let staff = StaffRepository::new(state.db.clone())
        .find_by_login(&req.restaurant_id, &req.login_id)?;

    // Fixed delay before inspecting the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let staff = match staff {
        Some(s) => s,
        None => {
            tracing::warn!(login_id = %req.login_id, "Login failed - unknown login id");
            return Err(invalid_credentials());
        }
    };

    if !staff.is_active {
        return Err(AppError::forbidden("Account has been disabled"));
    }

    let restaurant = RestaurantRepository::new(state.db.clone())
        .find_by_id(&staff.restaurant_id)?
        .ok_or_else(|| AppError::not_found("Restaurant not found"))?;
    if restaurant.is_blocked {
        return Err(AppError::forbidden("Restaurant is blocked"));
    }

    let pin_valid = pin::verify_pin(&req.pin, &staff.pin_hash)
        .map_err(|e| AppError::internal(format!("PIN verification failed: {}", e)))?;
    if !pin_valid {
        state.activity.record(
            &staff.restaurant_id,
            &staff.id,
            &staff.name,
            ActivityAction::LoginFailed,
            "Staff",
            &staff.id,
            None,
        );
        tracing::warn!(login_id = %req.login_id, "Login failed - wrong PIN");
        return Err(invalid_credentials());
    }

    let token = state
        .jwt
        .generate_token(&staff)
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    state.activity.record(
        &staff.restaurant_id,
        &staff.id,
        &staff.name,
        ActivityAction::Login,
        "Staff",
        &staff.id,
        None,
    );
    tracing::info!(staff_id = %staff.id, role = %staff.role, "Staff logged in");

    Ok(Json(LoginResponse {
        token,
        staff: StaffInfo {
            id: staff.id,
            name: staff.name,
            role: staff.role,
            restaurant_id: staff.restaurant_id,
        },
    }))
}

/// GET /api/auth/me
pub async fn me(Extension(staff): Extension<CurrentStaff>) -> Json<StaffInfo> {
    Json(StaffInfo {
        id: staff.staff_id,
        name: staff.name,
        role: staff.role,
        restaurant_id: staff.restaurant_id,
    })
}

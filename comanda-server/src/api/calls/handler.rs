//! Waiter-call handlers (staff side)

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{ActivityAction, WaiterCall};

/// GET /api/calls/pending
pub async fn list_pending(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
) -> AppResult<Json<Vec<WaiterCall>>> {
    Ok(Json(state.calls.list_pending(&staff.restaurant_id)?))
}

/// POST /api/calls/:id/attend
pub async fn attend(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<String>,
) -> AppResult<Json<WaiterCall>> {
    let call = state.calls.attend(&id, &staff.staff_id)?;
    state.activity.record(
        &staff.restaurant_id,
        &staff.staff_id,
        &staff.name,
        ActivityAction::CallAttended,
        "WaiterCall",
        &call.id,
        Some(format!("Table {}", call.table_number)),
    );
    Ok(Json(call))
}

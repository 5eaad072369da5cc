//! Activity log handlers

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{ActivityEntry, StaffRole};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

/// GET /api/activity - newest first
pub async fn list(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ActivityEntry>>> {
    staff.require_role(StaffRole::Admin)?;
    Ok(Json(state.activity.list(&staff.restaurant_id, query.limit)?))
}

//! Rating handlers (staff side)

use axum::{extract::State, Extension, Json};

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::db::repository::RatingRepository;
use crate::utils::AppResult;
use shared::models::Rating;

/// GET /api/ratings - newest first
pub async fn list(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
) -> AppResult<Json<Vec<Rating>>> {
    let ratings =
        RatingRepository::new(state.db.clone()).find_by_restaurant(&staff.restaurant_id)?;
    Ok(Json(ratings))
}

//! Activity log routes (admin-only)

mod handler;

use axum::{routing::get, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/activity", get(handler::list))
}

//! Restaurant routes
//!
//! - `/api/restaurants/signup` - public: creates a restaurant together
//!   with its first admin staff member
//! - `/api/restaurants/me` - the caller's restaurant
//! - `/api/admin/restaurants*` - super-admin surface (block/unblock),
//!   gated by the `X-Super-Admin-Token` header instead of a staff JWT

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/restaurants/signup", post(handler::signup))
        .route("/api/restaurants/me", get(handler::me))
        .route("/api/admin/restaurants", get(handler::list_all))
        .route("/api/admin/restaurants/{id}/block", post(handler::block))
        .route("/api/admin/restaurants/{id}/unblock", post(handler::unblock))
}

//! Waiter-call routes (staff side)
//!
//! Customers create calls through the public `/api/customer/calls` route.

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/calls", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/pending", get(handler::list_pending))
        .route("/{id}/attend", post(handler::attend))
}

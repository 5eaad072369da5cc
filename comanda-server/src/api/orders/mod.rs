//! Order routes
//!
//! Queries read snapshots; every mutation goes through the
//! `OrdersManager` command pipeline. Split endpoints are pure calculators
//! over the order's final total.

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/active", get(handler::list_active))
        .route("/items", post(handler::add_items))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/events", get(handler::list_events))
        .route("/{id}/tickets", get(handler::list_tickets))
        .route("/{id}/remove-item", post(handler::remove_item))
        .route("/{id}/checkout", post(handler::checkout))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/split/equal", post(handler::split_equal))
        .route("/{id}/split/manual", post(handler::split_manual))
}

//! Public customer routes
//!
//! The surface behind the QR code on the table: browse the menu, place a
//! self-service order, follow its status, call a waiter, and rate the
//! visit after paying. No staff token involved; the auth middleware skips
//! `/api/customer/*`.

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/customer", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/menu", get(handler::menu))
        .route("/tables/{table_id}/order", get(handler::current_order))
        .route("/tables/{table_id}/items", post(handler::add_items))
        .route("/orders/{id}/name", post(handler::update_name))
        .route("/calls", post(handler::call_waiter))
        .route("/ratings", post(handler::submit_rating))
}

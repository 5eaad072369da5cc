//! Menu catalog routes
//!
//! Categories and items under one module; reads are open to all staff,
//! mutations are admin-only (checked in the handlers).

mod handler;

use axum::{routing::get, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/menu/categories", category_routes())
        .nest("/api/menu/items", item_routes())
}

fn category_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_categories).post(handler::create_category))
        .route(
            "/{id}",
            axum::routing::put(handler::update_category).delete(handler::delete_category),
        )
}

fn item_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_items).post(handler::create_item))
        .route(
            "/{id}",
            axum::routing::put(handler::update_item).delete(handler::delete_item),
        )
}

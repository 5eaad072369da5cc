//! Rating dashboard routes (staff side)
//!
//! Customers submit ratings through the public `/api/customer/ratings`
//! route; here staff read them.

mod handler;

use axum::{routing::get, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/ratings", get(handler::list))
}

//! Authentication routes
//!
//! - `/api/auth/login`: public (skipped by the auth middleware)
//! - `/api/auth/me`: requires a valid token

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/me", get(handler::me))
}

//! Server core: configuration, shared state, HTTP server

mod config;
mod server;
mod state;

pub use config::Config;
pub use server::{build_router, Server};
pub use state::ServerState;

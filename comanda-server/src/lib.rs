//! Comanda Server - self-hosted restaurant point-of-sale backend
//!
//! # Architecture
//!
//! ```text
//! comanda-server/src/
//! ├── core/      # configuration, shared state, HTTP server
//! ├── api/       # routers and handlers, one module per resource
//! ├── auth/      # PIN login, JWT, middleware
//! ├── orders/    # event-sourced order lifecycle manager
//! ├── tables/    # table registry
//! ├── tickets/   # kitchen ticket dispatcher
//! ├── billing/   # bill split calculator
//! ├── calls/     # waiter-call queue
//! ├── audit/     # activity log
//! ├── db/        # redb persistence and entity repositories
//! └── utils/     # errors, logging, time
//! ```
//!
//! Every order and table mutation funnels through the
//! [`OrdersManager`] command pipeline, which validates inside a single
//! redb write transaction; dashboards read snapshots or subscribe to the
//! event broadcast.

pub mod api;
pub mod audit;
pub mod auth;
pub mod billing;
pub mod calls;
pub mod core;
pub mod db;
pub mod orders;
pub mod tables;
pub mod tickets;
pub mod utils;

// Re-export common types
pub use auth::{CurrentStaff, JwtService};
pub use crate::core::{build_router, Config, Server, ServerState};
pub use orders::{OrderStorage, OrdersManager};
pub use utils::logger::{init_logger, init_logger_with_file};
pub use utils::{AppError, AppResponse, AppResult};

/// Load `.env`, create the working directory and initialize logging.
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".to_string());
    let log_dir = std::path::Path::new(&work_dir).join("logs");
    std::fs::create_dir_all(&log_dir)?;

    utils::logger::init_logger_with_file(None, log_dir.to_str());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _________  __  ______    _  ______  ___
  / ___/ __ \/  |/  / _ |  / |/ / __ \/ _ |
 / /__/ /_/ / /|_/ / __ | /    / /_/ / __ |
 \___/\____/_/  /_/_/ |_|/_/|_/_____/_/ |_|
    "#
    );
}

//! Server state - shared service handles

use std::sync::Arc;

use crate::audit::ActivityLog;
use crate::auth::JwtService;
use crate::calls::CallQueue;
use crate::core::Config;
use crate::db::Db;
use crate::orders::OrdersManager;
use crate::tables::TableRegistry;
use crate::tickets::TicketDispatcher;

/// Shared server state
///
/// Holds Arc/cloneable handles to every service; cloning is cheap and every
/// axum handler receives one via `State`.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: Db,
    pub orders: Arc<OrdersManager>,
    pub tables: TableRegistry,
    pub tickets: TicketDispatcher,
    pub calls: CallQueue,
    pub activity: ActivityLog,
    pub jwt: Arc<JwtService>,
}

impl ServerState {
    /// Open the database and wire up all services
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let db = Db::open(config.db_path())?;
        Self::with_db(config, db)
    }

    /// Build state over an existing database handle (tests use an
    /// in-memory one)
    pub fn with_db(config: &Config, db: Db) -> anyhow::Result<Self> {
        let orders = OrdersManager::new(db.clone())?;
        Ok(Self {
            config: Arc::new(config.clone()),
            db: db.clone(),
            orders: Arc::new(orders),
            tables: TableRegistry::new(db.clone()),
            tickets: TicketDispatcher::new(db.clone()),
            calls: CallQueue::new(db.clone()),
            activity: ActivityLog::new(db),
            jwt: Arc::new(JwtService::new(config.jwt.clone())),
        })
    }
}

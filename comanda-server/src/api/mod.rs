//! API route modules
//!
//! One module per resource, each exposing a `router()` merged in
//! `core::server`. Authentication is applied at the router level; the
//! middleware skips the public paths (login, signup, `/api/customer/*`,
//! health).
//!
//! - [`health`] - liveness check
//! - [`auth`] - staff PIN login, current session
//! - [`restaurants`] - signup, block/unblock
//! - [`tables`] - table registry
//! - [`orders`] - order lifecycle commands and queries, bill splitting
//! - [`kitchen_tickets`] - kitchen ticket board
//! - [`calls`] - waiter-call queue (staff side)
//! - [`customer`] - public QR-code surface: menu, self-ordering, calls,
//!   ratings
//! - [`menu`] - catalog administration
//! - [`staff`] - staff administration
//! - [`ratings`] - rating dashboards
//! - [`activity`] - activity log

pub mod activity;
pub mod auth;
pub mod calls;
pub mod customer;
pub mod health;
pub mod kitchen_tickets;
pub mod menu;
pub mod orders;
pub mod ratings;
pub mod restaurants;
pub mod staff;
pub mod tables;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResponse, AppResult};

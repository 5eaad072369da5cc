//! Staff authentication
//!
//! PIN login (argon2-hashed credentials) issuing JWTs; a middleware layer
//! validates the token on protected routes and exposes the caller as a
//! [`CurrentStaff`] extension.

pub mod jwt;
pub mod pin;

mod middleware;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{auth_middleware, CurrentStaff};

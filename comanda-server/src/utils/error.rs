//! Unified error handling
//!
//! Provides the application-level error type and response structure:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response envelope
//!
//! Every error surfaces synchronously to the initiating request as a
//! user-visible message; nothing is retried automatically and nothing is
//! fatal to the process.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use shared::order::{CommandError, CommandErrorCode};

/// Unified API response envelope
///
/// ```json
/// {
///   "code": "0000",
///   "message": "success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code ("0000" means success)
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> AppResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: "0000".to_string(),
            message: "success".to_string(),
            data: Some(data),
        }
    }
}

/// Application error enum
///
/// Validation, not-found, invalid-state and conflict errors, plus auth
/// and system errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication (4xx) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== Business logic (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    // ========== System (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        AppError::InvalidState(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        AppError::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001", self.to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "E3002", self.to_string()),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E3003", self.to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),
            AppError::InvalidState(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.clone())
            }
            AppError::Database(msg) => {
                error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E0001",
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9999",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        };
        (status, Json(body)).into_response()
    }
}

impl From<CommandError> for AppError {
    fn from(err: CommandError) -> Self {
        match err.code {
            CommandErrorCode::OrderNotFound | CommandErrorCode::TableNotFound => {
                AppError::NotFound(err.message)
            }
            CommandErrorCode::LineItemNotFound => AppError::NotFound(err.message),
            CommandErrorCode::TableOccupied => AppError::Conflict(err.message),
            CommandErrorCode::OrderNotOpen | CommandErrorCode::EmptyOrder => {
                AppError::InvalidState(err.message)
            }
            CommandErrorCode::ReasonRequired
            | CommandErrorCode::InvalidQuantity
            | CommandErrorCode::InvalidAmount => AppError::Validation(err.message),
            CommandErrorCode::InvalidOperation => AppError::InvalidState(err.message),
            CommandErrorCode::InternalError => AppError::Internal(err.message),
        }
    }
}

impl From<crate::db::DbError> for AppError {
    fn from(err: crate::db::DbError) -> Self {
        match err {
            crate::db::DbError::NotFound(msg) => AppError::NotFound(msg),
            other => AppError::Database(other.to_string()),
        }
    }
}

impl From<crate::tables::TableError> for AppError {
    fn from(err: crate::tables::TableError) -> Self {
        use crate::tables::TableError;
        match err {
            TableError::NotFound(id) => AppError::NotFound(format!("Table {} not found", id)),
            TableError::DuplicateNumber { .. } => AppError::Conflict(err.to_string()),
            TableError::InvalidTransition { .. } | TableError::Occupied(_) => {
                AppError::InvalidState(err.to_string())
            }
            TableError::Storage(msg) => AppError::Database(msg),
        }
    }
}

impl From<crate::tickets::TicketError> for AppError {
    fn from(err: crate::tickets::TicketError) -> Self {
        use crate::tickets::TicketError;
        match err {
            TicketError::NotFound(id) => {
                AppError::NotFound(format!("Kitchen ticket {} not found", id))
            }
            TicketError::InvalidTransition { .. }
            | TicketError::CancelViaOrderOnly
            | TicketError::NotTerminal(_) => AppError::InvalidState(err.to_string()),
            TicketError::Storage(msg) => AppError::Database(msg),
        }
    }
}

impl From<crate::calls::CallError> for AppError {
    fn from(err: crate::calls::CallError) -> Self {
        use crate::calls::CallError;
        match err {
            CallError::NotFound(id) => {
                AppError::NotFound(format!("Waiter call {} not found", id))
            }
            CallError::AlreadyAttended(_) => AppError::InvalidState(err.to_string()),
            CallError::Storage(msg) => AppError::Database(msg),
        }
    }
}

impl From<crate::billing::BillingError> for AppError {
    fn from(err: crate::billing::BillingError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;

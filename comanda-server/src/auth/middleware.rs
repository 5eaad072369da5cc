//! Authentication middleware and request-scoped identity

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::core::ServerState;
use crate::utils::AppError;
use shared::models::StaffRole;

use super::jwt::JwtError;

/// The authenticated caller, inserted as a request extension.
#[derive(Debug, Clone)]
pub struct CurrentStaff {
    pub staff_id: String,
    pub name: String,
    pub role: StaffRole,
    pub restaurant_id: String,
}

impl CurrentStaff {
    /// Reject callers without the given role. Admins pass every check.
    pub fn require_role(&self, role: StaffRole) -> Result<(), AppError> {
        if self.role == role || self.role == StaffRole::Admin {
            Ok(())
        } else {
            Err(AppError::forbidden(format!("{} role required", role)))
        }
    }
}

/// Paths reachable without a staff token:
///
/// - `OPTIONS *` (CORS preflight)
/// - anything outside `/api/` (health check; unknown paths 404 normally)
/// - `/api/auth/login`
/// - `/api/restaurants/signup`
/// - `/api/customer/*` (QR-code menu: self-ordering, waiter calls, ratings)
/// - `/api/admin/*` (super-admin surface; gated by its own token check)
fn is_public(path: &str) -> bool {
    !path.starts_with("/api/")
        || path == "/api/auth/login"
        || path == "/api/restaurants/signup"
        || path.starts_with("/api/customer/")
        || path.starts_with("/api/admin/")
}

/// Validate the Bearer token and attach [`CurrentStaff`] to the request.
pub async fn auth_middleware(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.method() == http::Method::OPTIONS || is_public(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    let claims = state.jwt.verify_token(token).map_err(|e| match e {
        JwtError::Expired => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })?;

    request.extensions_mut().insert(CurrentStaff {
        staff_id: claims.sub,
        name: claims.name,
        role: claims.role,
        restaurant_id: claims.restaurant_id,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_and_login_paths_are_public() {
        assert!(is_public("/health"));
        assert!(is_public("/api/auth/login"));
        assert!(is_public("/api/restaurants/signup"));
        assert!(is_public("/api/customer/menu"));
        assert!(is_public("/api/customer/calls"));
        assert!(!is_public("/api/tables"));
        assert!(!is_public("/api/orders/active"));
        assert!(!is_public("/api/auth/me"));
    }
}

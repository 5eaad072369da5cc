//! JWT token service
//!
//! Issues and validates the tokens carried by staff sessions after a
//! successful PIN login.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared::models::{Staff, StaffRole};

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes in production)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("JWT_SECRET not set, using development key");
                "development-only-jwt-secret-change-me".to_string()
            }
            #[cfg(not(debug_assertions))]
            {
                panic!("JWT_SECRET must be set in production builds");
            }
        });

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(720), // 12h shift
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "comanda-server".to_string()),
        }
    }
}

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Staff ID (subject)
    pub sub: String,
    /// Display name
    pub name: String,
    pub role: StaffRole,
    pub restaurant_id: String,
    /// Expiry timestamp (seconds)
    pub exp: i64,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
    pub iss: String,
}

/// JWT errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

/// Token issue/verify service
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// Issue a token for a logged-in staff member
    pub fn generate_token(&self, staff: &Staff) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: staff.id.clone(),
            name: staff.name.clone(),
            role: staff.role,
            restaurant_id: staff.restaurant_id.clone(),
            exp: (now + Duration::minutes(self.config.expiration_minutes)).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| JwtError::Encoding(e.to_string()))
    }

    /// Verify a token and return its claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::Invalid(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_staff() -> Staff {
        Staff {
            id: "staff-1".to_string(),
            restaurant_id: "rest-1".to_string(),
            name: "Ana".to_string(),
            login_id: "ana".to_string(),
            pin_hash: "unused".to_string(),
            role: StaffRole::Waiter,
            is_active: true,
            created_at: 0,
        }
    }

    fn service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-test-secret-test-secret".to_string(),
            expiration_minutes: 60,
            issuer: "comanda-server".to_string(),
        })
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let service = service();
        let token = service.generate_token(&test_staff()).unwrap();
        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "staff-1");
        assert_eq!(claims.role, StaffRole::Waiter);
        assert_eq!(claims.restaurant_id, "rest-1");
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = service();
        let token = service.generate_token(&test_staff()).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(matches!(
            service.verify_token(&tampered),
            Err(JwtError::Invalid(_))
        ));
    }
}

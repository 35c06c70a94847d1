use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use daidi_core::{Principal, UserRole};

use crate::error::AppError;
use crate::state::{AppState, AuthConfig};

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub is_superuser: bool,
    pub exp: usize,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Principal {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
            is_superuser: claims.is_superuser,
        }
    }
}

/// Sign an HS256 token for `principal` that expires after the configured lifetime.
pub fn issue_token(auth: &AuthConfig, principal: &Principal) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: principal.user_id.clone(),
        email: principal.email.clone(),
        name: principal.name.clone(),
        role: principal.role,
        is_superuser: principal.is_superuser,
        exp: (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(auth.secret.as_bytes()))
}

// ============================================================================
// Authentication Middleware
// ============================================================================

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 1. Extract token from Authorization header
    let token = req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::AuthenticationError("Missing bearer token".to_string()))?;

    // 2. Decode and validate JWT
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    ).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        AppError::AuthenticationError("Invalid or expired token".to_string())
    })?;

    // 3. Inject the caller into request extensions
    req.extensions_mut().insert(Principal::from(token_data.claims));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_token_round_trips() {
        let auth = AuthConfig { secret: "test-secret".to_string(), expiration: 60 };
        let principal = Principal {
            user_id: "staff-1".to_string(),
            email: Some("staff@daidi.ir".to_string()),
            name: Some("Nima Rahimi".to_string()),
            role: UserRole::Staff,
            is_superuser: false,
        };

        let token = issue_token(&auth, &principal).unwrap();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(auth.secret.as_bytes()),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(Principal::from(data.claims), principal);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let auth = AuthConfig { secret: "test-secret".to_string(), expiration: 60 };
        let principal = Principal {
            user_id: "guest-1".to_string(),
            email: None,
            name: None,
            role: UserRole::Customer,
            is_superuser: false,
        };

        let token = issue_token(&auth, &principal).unwrap();
        let result = decode::<Claims>(&token, &DecodingKey::from_secret(b"other"), &Validation::default());
        assert!(result.is_err());
    }
}

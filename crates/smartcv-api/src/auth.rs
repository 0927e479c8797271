//! Bearer JWT authentication.
//!
//! The middleware verifies the `Authorization: Bearer <token>` header and
//! stashes an `AuthUser` in the request extensions; handlers pull it back
//! out through the `AuthUser` extractor.

use crate::error::HttpAppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use smartcv_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    /// Expiry, seconds since epoch.
    pub exp: i64,
    /// Issued at, seconds since epoch.
    pub iat: i64,
}

/// The authenticated caller, inserted by `auth_middleware`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[derive(Clone)]
pub struct AuthState {
    pub jwt_secret: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().copied().ok_or_else(|| {
            HttpAppError(AppError::Unauthorized(
                "Missing authentication context".to_string(),
            ))
        })
    }
}

fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    if !auth_header.starts_with("Bearer ") {
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    }

    let token = &auth_header[7..];
    match verify_token(&auth_state.jwt_secret, token) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthUser {
                user_id: claims.sub,
            });
            next.run(request).await
        }
        Err(e) => HttpAppError(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-key-at-least-32-characters";

    // Tokens are issued by the identity provider in production; this mints
    // one with the same claim shape.
    fn issue_token(secret: &str, user_id: Uuid, expiry_hours: i64) -> String {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id,
            exp: (now + chrono::Duration::hours(expiry_hours)).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let user_id = Uuid::new_v4();
        let token = issue_token(SECRET, user_id, 24);
        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_token(SECRET, Uuid::new_v4(), 24);
        let err = verify_token("another-secret-also-32-characters-long", &token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = issue_token(SECRET, Uuid::new_v4(), -1);
        let err = verify_token(SECRET, &token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let err = verify_token(SECRET, "not.a.jwt").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}

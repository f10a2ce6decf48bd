//! Bearer token authentication for Axum
//!
//! [`authenticate`] validates the `Authorization: Bearer <token>` header. The
//! router's auth layer inserts the resulting [`AuthContext`] into the request
//! extensions, and handlers take it as an extractor; on a route without the
//! layer the extractor fails with 401.
//!
//! Every authentication failure answers 401 with `WWW-Authenticate: Bearer`.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::jwt::{validate_access_token, Claims, JwtError, JwtSettings};
use crate::models::user::UserRole;

/// Authenticated caller, added to request extensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Header present but not a Bearer credential
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
            other => AuthError::InvalidToken(format!("Invalid token: {}", other)),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": "unauthorized",
            "message": self.to_string(),
        }));

        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"))],
            body,
        )
            .into_response()
    }
}

/// Extracts and validates the bearer token from request headers
pub fn authenticate(headers: &HeaderMap, settings: &JwtSettings) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_access_token(token, settings)?;

    Ok(AuthContext::from_claims(claims))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn test_authenticate_valid_token() {
        let settings = JwtSettings::new(SECRET);
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "root@example.com", UserRole::Admin, &settings);
        let token = create_token(&claims, &settings).unwrap();

        let ctx = authenticate(&bearer(&token), &settings).unwrap();
        assert_eq!(ctx.user_id, user_id);
        assert_eq!(ctx.email, "root@example.com");
        assert!(ctx.is_admin());
    }

    #[test]
    fn test_authenticate_failures() {
        let settings = JwtSettings::new(SECRET);

        assert!(matches!(
            authenticate(&HeaderMap::new(), &settings),
            Err(AuthError::MissingCredentials)
        ));

        let mut basic = HeaderMap::new();
        basic.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(
            authenticate(&basic, &settings),
            Err(AuthError::InvalidFormat(_))
        ));

        assert!(matches!(
            authenticate(&bearer("garbage"), &settings),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_auth_error_response_has_challenge() {
        for err in [
            AuthError::MissingCredentials,
            AuthError::InvalidFormat("x".to_string()),
            AuthError::InvalidToken("x".to_string()),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
                "Bearer"
            );
        }
    }
}

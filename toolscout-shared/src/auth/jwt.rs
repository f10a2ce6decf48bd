//! JWT access token generation and validation
//!
//! Access tokens are minted at login and carry the subject id, email and role.
//! They are signed with a shared HMAC secret; the algorithm is configurable
//! between HS256 (default), HS384 and HS512.
//!
//! There is no refresh token and no revocation: a token is valid until `exp`.
//!
//! # Example
//!
//! ```
//! use toolscout_shared::auth::jwt::{create_token, validate_access_token, Claims, JwtSettings};
//! use toolscout_shared::models::user::UserRole;
//! use uuid::Uuid;
//!
//! let settings = JwtSettings::new("a-shared-secret-of-at-least-32-bytes!!");
//! let claims = Claims::new(Uuid::new_v4(), "ada@example.com", UserRole::User, &settings);
//!
//! let token = create_token(&claims, &settings).unwrap();
//! let validated = validate_access_token(&token, &settings).unwrap();
//! assert_eq!(validated.sub, claims.sub);
//! ```

use std::str::FromStr;

use chrono::{Duration, Utc};
pub use jsonwebtoken::Algorithm;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Issuer written into and required from every token
pub const ISSUER: &str = "toolscout";

/// Default access token lifetime (24 hours)
pub const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 1440;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },

    /// Configured algorithm is not an HMAC algorithm
    #[error("Unsupported JWT algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Signing configuration shared by token minting and validation
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub algorithm: Algorithm,
    pub access_token_ttl: Duration,
}

impl JwtSettings {
    /// Settings with HS256 and the default 24h lifetime
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            access_token_ttl: Duration::minutes(DEFAULT_ACCESS_TOKEN_MINUTES),
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }
}

/// Parses a configured algorithm name; only HMAC algorithms are accepted
pub fn parse_algorithm(name: &str) -> Result<Algorithm, JwtError> {
    match Algorithm::from_str(name) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(JwtError::UnsupportedAlgorithm(name.to_string())),
    }
}

/// JWT claims
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "toolscout")
/// - `iat`, `exp`, `nbf`: Unix timestamps
///
/// # Custom Claims
///
/// - `email`: Account email at the time of login
/// - `role`: Account role, checked by the admin gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
}

impl Claims {
    /// Creates claims expiring after the configured access token lifetime
    pub fn new(user_id: Uuid, email: impl Into<String>, role: UserRole, settings: &JwtSettings) -> Self {
        Self::with_expiration(user_id, email, role, settings.access_token_ttl)
    }

    /// Creates claims with custom expiration
    pub fn with_expiration(
        user_id: Uuid,
        email: impl Into<String>,
        role: UserRole,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            email: email.into(),
            role,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
        }
    }
}

/// Signs claims with the configured secret and algorithm
pub fn create_token(claims: &Claims, settings: &JwtSettings) -> Result<String, JwtError> {
    let header = Header::new(settings.algorithm);
    let key = EncodingKey::from_secret(settings.secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates an access token and extracts its claims
///
/// Verifies the signature, `exp`, `nbf` and the issuer. A token signed with a
/// different algorithm than the configured one is rejected.
pub fn validate_access_token(token: &str, settings: &JwtSettings) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(settings.secret.as_bytes());

    let mut validation = Validation::new(settings.algorithm);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: ISSUER.to_string(),
        },
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

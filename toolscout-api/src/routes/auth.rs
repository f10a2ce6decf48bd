//! Authentication endpoints
//!
//! - `POST /auth/signup` - Create an account with the `user` role
//! - `POST /auth/login` - Exchange email and password for an access token
//!
//! There is no refresh endpoint; clients log in again once the token expires.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use toolscout_shared::{
    auth::jwt::{self, Claims},
    models::user::{CreateUser, UserProfile, UserRole},
    store::UserStore,
};
use tracing::info;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,

    /// Always `bearer`
    pub token_type: String,

    pub user: UserProfile,
}

/// Register a new account
///
/// ```text
/// POST /auth/signup
/// {"name": "Ada", "email": "ada@example.com", "password": "correct horse"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already registered
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let Json(req) = payload?;
    req.validate()?;

    if state.store.find_user_by_email(&req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = state.credentials.hash(&req.password)?;

    // The store enforces email uniqueness too; a lost race still maps to 409
    let user = state
        .store
        .create_user(CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: UserRole::User,
        })
        .await?;

    info!(user_id = %user.id, "User signed up");

    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}

/// Authenticate and mint an access token
///
/// ```text
/// POST /auth/login
/// {"email": "ada@example.com", "password": "correct horse"}
///
/// {"accessToken": "eyJ...", "tokenType": "bearer", "user": {...}}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = state
        .store
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(invalid)?;

    if !state.credentials.verify(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    let claims = Claims::new(user.id, &user.email, user.role, state.jwt());
    let access_token = jwt::create_token(&claims, state.jwt())?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: UserProfile::from(&user),
    }))
}

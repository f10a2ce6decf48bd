//! Service error taxonomy
//!
//! Every operation in the review lifecycle fails with one of these variants.
//! The API layer maps each variant to an HTTP status; nothing here is retried.

use crate::auth::{authorization::AuthzError, middleware::AuthError};
use crate::store::StoreError;

/// Result alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors raised by the review lifecycle and catalog operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing, malformed, or expired credential
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Valid credential with insufficient role
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Malformed identifier, out-of-range value, empty update, or illegal transition
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Referenced tool, review, or user does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate review for the same user and tool, or duplicate email
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Backend failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ServiceError::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ServiceError::NotFound(msg.into())
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        ServiceError::Unauthenticated(err.to_string())
    }
}

impl From<AuthzError> for ServiceError {
    fn from(err: AuthzError) -> Self {
        ServiceError::Forbidden(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    #[test]
    fn test_error_display() {
        let err = ServiceError::invalid("Rating must be between 1 and 5");
        assert_eq!(
            err.to_string(),
            "Invalid argument: Rating must be between 1 and 5"
        );

        let err = ServiceError::not_found("Tool not found");
        assert_eq!(err.to_string(), "Not found: Tool not found");
    }

    #[test]
    fn test_store_conflict_converts() {
        let err: ServiceError = StoreError::Conflict("email".to_string()).into();
        assert!(matches!(err, ServiceError::Store(StoreError::Conflict(_))));
    }

    #[test]
    fn test_auth_error_is_unauthenticated() {
        let err: ServiceError = AuthError::MissingCredentials.into();
        assert!(matches!(
            err,
            ServiceError::Unauthenticated(ref msg) if msg == "Missing authorization header"
        ));
    }

    #[test]
    fn test_authz_error_is_forbidden() {
        let err: ServiceError = AuthzError::InsufficientRole {
            required: UserRole::Admin,
            actual: UserRole::User,
        }
        .into();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }
}

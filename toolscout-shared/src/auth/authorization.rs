//! Role checks
//!
//! ToolScout has two roles. Regular users submit reviews; administrators
//! additionally moderate reviews and manage the catalog. There is no
//! role hierarchy beyond that.

use super::middleware::AuthContext;
use crate::models::user::UserRole;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthzError {
    /// Caller doesn't have the required role
    #[error("Insufficient permissions: requires {required:?}, has {actual:?}")]
    InsufficientRole { required: UserRole, actual: UserRole },
}

/// Fails unless the caller has exactly `required`
pub fn require_role(auth: &AuthContext, required: UserRole) -> Result<(), AuthzError> {
    if auth.role != required {
        return Err(AuthzError::InsufficientRole {
            required,
            actual: auth.role,
        });
    }

    Ok(())
}

/// Fails with [`AuthzError::InsufficientRole`] unless the caller is an admin
pub fn require_admin(auth: &AuthContext) -> Result<(), AuthzError> {
    require_role(auth, UserRole::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn ctx(role: UserRole) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&ctx(UserRole::Admin)).is_ok());
        assert_eq!(
            require_admin(&ctx(UserRole::User)),
            Err(AuthzError::InsufficientRole {
                required: UserRole::Admin,
                actual: UserRole::User,
            })
        );
    }
}

//! Credential hashing and verification
//!
//! Signup stores the output of a [`CredentialScheme`] and login verifies
//! against it. The default scheme is Argon2id; anything implementing the trait
//! can be substituted without touching the review lifecycle.
//!
//! Hashes use the PHC string format, so the parameters travel with the hash
//! and verification works across parameter changes.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for credential operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// A one-way credential scheme
pub trait CredentialScheme: Send + Sync {
    /// Produces the value stored as the user's credential secret
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Checks a presented password; `Ok(false)` means a plain mismatch
    fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordError>;
}

/// Argon2id with configurable cost parameters
#[derive(Debug, Clone, Copy)]
pub struct Argon2Scheme {
    m_cost: u32,
    t_cost: u32,
    p_cost: u32,
}

impl Argon2Scheme {
    /// `m_cost` is in KiB and must be at least `8 * p_cost`
    pub fn new(m_cost: u32, t_cost: u32, p_cost: u32) -> Self {
        Self {
            m_cost,
            t_cost,
            p_cost,
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>, PasswordError> {
        let params = ParamsBuilder::new()
            .m_cost(self.m_cost)
            .t_cost(self.t_cost)
            .p_cost(self.p_cost)
            .output_len(32)
            .build()
            .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

        Ok(Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2Scheme {
    /// 64 MiB, 3 iterations, 4 lanes
    fn default() -> Self {
        Self::new(65536, 3, 4)
    }
}

impl CredentialScheme for Argon2Scheme {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(stored)
            .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

        // Parameters are read from the hash itself
        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
        }
    }
}

//! Authentication and authorization
//!
//! # Modules
//!
//! - [`jwt`]: Access token minting and validation (HS256/384/512)
//! - [`password`]: Pluggable credential scheme, Argon2id by default
//! - [`middleware`]: Bearer token middleware and the [`middleware::AuthContext`] extractor
//! - [`authorization`]: Role checks

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;

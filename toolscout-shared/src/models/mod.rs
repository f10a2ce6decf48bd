//! Domain models for ToolScout
//!
//! # Models
//!
//! - `user`: Accounts and roles
//! - `tool`: Catalog entries with the derived aggregate rating
//! - `review`: Reviews and their moderation status
//! - `pagination`: Page requests and paged results
//!
//! Persistence lives in [`crate::store`]; these types carry no storage logic
//! beyond their `sqlx::FromRow`/`sqlx::Type` mappings.

pub mod pagination;
pub mod review;
pub mod tool;
pub mod user;

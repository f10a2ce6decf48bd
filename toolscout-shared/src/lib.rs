//! # ToolScout Shared Library
//!
//! This crate contains shared types, storage backends, and business logic used by
//! the ToolScout API server.
//!
//! ## Module Organization
//!
//! - `models`: Users, tools, reviews and pagination types
//! - `store`: Storage traits with PostgreSQL and in-memory backends
//! - `auth`: Token validation, credential schemes and role checks
//! - `reviews`: Review lifecycle, moderation state machine and rating aggregation
//! - `catalog`: Tool administration with review cascade on delete
//! - `db`: Connection pool and migrations
//! - `error`: Service error taxonomy

pub mod auth;
pub mod catalog;
pub mod db;
pub mod error;
pub mod models;
pub mod reviews;
pub mod store;

/// Current version of the ToolScout shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Database layer
//!
//! - `pool`: PostgreSQL connection pool with a startup health check
//! - `migrations`: Embedded migration runner for the `migrations/` directory

pub mod migrations;
pub mod pool;

//! Configuration management for the API server
//!
//! Configuration is read from environment variables, after loading a `.env`
//! file if one is present.
//!
//! # Environment Variables
//!
//! - `API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `API_PORT`: Port to bind to (default: 8080)
//! - `API_PRODUCTION`: Enables HSTS (default: false)
//! - `CORS_ORIGINS`: Comma separated origins, `*` for any
//!   (default: `http://localhost:3000,http://localhost:5173`)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
//! - `JWT_SECRET`: Token signing secret, at least 32 characters (required)
//! - `JWT_ALGORITHM`: HS256, HS384 or HS512 (default: HS256)
//! - `ACCESS_TOKEN_EXPIRE_MINUTES`: Access token lifetime (default: 1440)
//! - `LOG_FORMAT`: `json` for JSON logs, anything else for text
//! - `RUST_LOG`: Log filter

use std::env;

use anyhow::{anyhow, bail, Context};
use chrono::Duration;
use toolscout_shared::{
    auth::jwt::{parse_algorithm, JwtSettings, DEFAULT_ACCESS_TOKEN_MINUTES},
    db::pool::DatabaseConfig,
};

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtSettings,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Production mode turns on HSTS
    pub production: bool,

    /// Allowed CORS origins; `["*"]` allows any
    pub cors_origins: Vec<String>,
}

impl ApiConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

impl Config {
    /// Loads configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("API_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("API_PORT must be a valid port number")?;
        let production = lookup("API_PRODUCTION")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.len() < 32 {
            bail!("JWT_SECRET must be at least 32 characters long");
        }
        let algorithm = parse_algorithm(
            &lookup("JWT_ALGORITHM").unwrap_or_else(|| "HS256".to_string()),
        )?;
        let ttl_minutes = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(v) => v
                .parse::<i64>()
                .context("ACCESS_TOKEN_EXPIRE_MINUTES must be an integer")?,
            None => DEFAULT_ACCESS_TOKEN_MINUTES,
        };
        if ttl_minutes <= 0 {
            bail!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive");
        }

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                production,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
                ..Default::default()
            },
            jwt: JwtSettings::new(jwt_secret)
                .with_algorithm(algorithm)
                .with_ttl(Duration::minutes(ttl_minutes)),
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

//! Service banner and health check
//!
//! ```text
//! GET /        {"message": "ToolScout API", "version": "0.1.0", "status": "running"}
//! GET /health  {"status": "healthy", "version": "0.1.0", "database": "connected"}
//! ```

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use toolscout_shared::store::CatalogStore;

use crate::app::AppState;

/// Root banner
#[derive(Debug, Serialize, Deserialize)]
pub struct BannerResponse {
    pub message: String,
    pub version: String,
    pub status: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,

    pub version: String,

    /// `connected` or `disconnected`
    pub database: String,
}

pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "ToolScout API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
    })
}

/// Reports store connectivity; answers 503 when the store is unreachable
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, health, database) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "healthy", "connected"),
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the store");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "disconnected")
        }
    };

    (
        status,
        Json(HealthResponse {
            status: health.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
        }),
    )
}

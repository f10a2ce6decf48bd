//! # ToolScout API Server
//!
//! Serves the tool catalog, review submission and the moderation workflow.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/toolscout \
//! JWT_SECRET=change-me-to-at-least-32-characters \
//! cargo run -p toolscout-api
//! ```

use std::sync::Arc;

use anyhow::Context;
use toolscout_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat},
    telemetry,
};
use toolscout_shared::{
    db::{migrations::run_migrations, pool},
    store::PgStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loads .env before the log format is read
    let config = Config::from_env()?;
    telemetry::init(LogFormat::from_env());

    tracing::info!(
        "ToolScout API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let db = pool::create_pool(&config.database)
        .await
        .context("Failed to connect to the database")?;
    run_migrations(&db).await.context("Failed to run migrations")?;

    let bind_address = config.bind_address();
    let state = AppState::new(Arc::new(PgStore::new(db.clone())), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        // Without a signal handler the server runs until killed
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}

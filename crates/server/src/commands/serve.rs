//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use common::{AppError, AppResult};

use crate::cli::args::ServeArgs;
use crate::config::ServerConfig;
use crate::infra::Database;
use crate::routes::create_router;
use crate::state::AppState;

pub async fn execute(args: ServeArgs, mut config: ServerConfig) -> AppResult<()> {
    if let Some(host) = args.host {
        config.service.host = host;
    }
    if let Some(port) = args.port {
        config.service.port = port;
    }

    tracing::info!("Starting server...");

    let db = Arc::new(Database::connect(&config.database).await?);
    let state = AppState::from_database(db, &config.jwt);
    let app = create_router(state, config.service.cors_allowed_origin.as_deref());

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

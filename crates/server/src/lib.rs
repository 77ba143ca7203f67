//! # bookrag-server
//!
//! The HTTP API in front of the `bookrag` library: a `/chat` endpoint routed
//! through the intent-aware chat client, plus health and readiness checks.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod router;
pub mod state;

use crate::{config::AppConfig, router::create_router, state::build_app_state};
use tracing::info;

/// The main entry point for running the server.
pub async fn run(listener: tokio::net::TcpListener, config: AppConfig) -> anyhow::Result<()> {
    let app_state = build_app_state(config)?;
    let app = create_router(app_state);

    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

mod auth;
mod config;
mod db;
mod enhance;
mod errors;
mod ingest;
mod llm_client;
mod models;
mod resumes;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::TokenValidator;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::GeminiClient;
use crate::resumes::store::PgResumeStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (pool lives for the whole process)
    let pool = create_pool(&config.database_url, config.db_max_connections).await?;

    // Initialize AI gateway
    let llm = GeminiClient::new(&config).context("Failed to build AI gateway client")?;
    info!("AI gateway initialized (model: {})", llm.model());

    // Build app state
    let state = AppState {
        resumes: Arc::new(PgResumeStore::new(pool)),
        llm: Arc::new(llm),
        tokens: Arc::new(TokenValidator::with_hs256(config.jwt_secret.as_bytes())),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

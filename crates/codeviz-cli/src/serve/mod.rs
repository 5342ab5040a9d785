//! Local HTTP API for diagram generation.
//!
//! # Module Structure
//!
//! - `handlers` - HTTP route handlers
//! - `models` - API request/response types (DTOs)
//! - `templates` - HTML page rendering

mod handlers;
mod models;
mod templates;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use codeviz_core::{Config, Pipeline};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state for the server.
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    /// Serializes SVG rendering; one render runs at a time.
    pub render_lock: Mutex<()>,
    pub max_source_bytes: usize,
    /// Wall-clock budget for one pipeline run.
    pub timeout: Duration,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        let server = &pipeline.config().server;
        let max_source_bytes = server.max_source_bytes;
        let timeout = Duration::from_secs(server.timeout_secs);
        Self {
            pipeline: Arc::new(pipeline),
            render_lock: Mutex::new(()),
            max_source_bytes,
            timeout,
        }
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Where the server listens.
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
}

impl From<&Config> for ServeConfig {
    fn from(config: &Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
        }
    }
}

// =============================================================================
// Server Entry Point
// =============================================================================

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/visualize", post(handlers::api_visualize))
        .route("/api/render", post(handlers::api_render))
        .route("/api/styles", get(handlers::api_styles))
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .with_state(state)
}

/// Start the API server and block until it stops.
pub async fn start_server(pipeline: Pipeline, config: ServeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(pipeline));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;

    info!(%addr, "codeviz server listening");
    println!("codeviz API: http://{}", addr);
    println!("Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;
    Ok(())
}

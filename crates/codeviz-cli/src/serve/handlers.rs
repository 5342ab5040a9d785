//! HTTP route handlers for the API server.
//!
//! Handlers are kept thin: validation here, all graph work in
//! `codeviz_core::Pipeline` on the blocking pool.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};

use codeviz_core::graph::{style_table, StyleTable};
use codeviz_core::{resolve_language, CodeStats, DiagramType, Language, VisualizeRequest, Visualization};

use super::models::{ErrorBody, VisualizeBody, VisualizeResponse};
use super::templates;
use super::AppState;
use crate::render;

// =============================================================================
// Errors
// =============================================================================

/// An error answered as `{"error": ...}` with the given status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

// =============================================================================
// Page Handlers
// =============================================================================

/// GET `/` - Form page posting to the render endpoint.
pub async fn index() -> Html<String> {
    Html(templates::render_index_page())
}

// =============================================================================
// API Handlers
// =============================================================================

/// POST `/api/visualize` - Graph, metadata and positions as JSON.
pub async fn api_visualize(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VisualizeBody>,
) -> Result<Json<VisualizeResponse>, ApiError> {
    let (visualization, code_stats) = execute(&state, body).await?;
    let language_used = visualization.language;
    Ok(Json(VisualizeResponse {
        visualization,
        code_stats,
        language_used,
    }))
}

/// POST `/api/render` - The same request rendered as SVG.
pub async fn api_render(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VisualizeBody>,
) -> Result<Response, ApiError> {
    let (visualization, _) = execute(&state, body).await?;
    let svg = {
        let _guard = state.render_lock.lock().await;
        render::render_svg(&visualization)
    };
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

/// GET `/api/styles` - Color and size per node kind.
pub async fn api_styles() -> Json<StyleTable> {
    Json(style_table())
}

/// Validate a body and run the pipeline within the time budget.
async fn execute(state: &Arc<AppState>, body: VisualizeBody) -> Result<(Visualization, CodeStats), ApiError> {
    let request = validate(state, body)?;
    debug!(
        language = %request.language,
        diagram = %request.diagram,
        bytes = request.source.len(),
        "visualize request"
    );

    // A timed-out blocking job keeps running; the deadline cuts its layout short.
    let request = request.with_deadline(Instant::now() + state.timeout);
    let pipeline = Arc::clone(&state.pipeline);
    let task = tokio::task::spawn_blocking(move || {
        let visualization = pipeline.run(&request)?;
        let stats = pipeline.code_stats(&request.source, request.language)?;
        Ok::<_, codeviz_core::PipelineError>((visualization, stats))
    });

    match tokio::time::timeout(state.timeout, task).await {
        Ok(Ok(Ok(result))) => Ok(result),
        Ok(Ok(Err(e))) => Err(ApiError::bad_request(e.to_string())),
        Ok(Err(e)) => {
            warn!(error = %e, "pipeline task failed");
            Err(ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Visualization failed".to_string(),
            })
        }
        Err(_) => {
            warn!(timeout_secs = state.timeout.as_secs(), "pipeline timed out");
            Err(ApiError {
                status: StatusCode::GATEWAY_TIMEOUT,
                message: format!(
                    "Visualization timed out after {} seconds",
                    state.timeout.as_secs()
                ),
            })
        }
    }
}

fn validate(state: &AppState, body: VisualizeBody) -> Result<VisualizeRequest, ApiError> {
    if body.code.trim().is_empty() {
        return Err(ApiError::bad_request("No code provided"));
    }
    if body.code.len() > state.max_source_bytes {
        return Err(ApiError::bad_request(format!(
            "Code exceeds the {} byte limit",
            state.max_source_bytes
        )));
    }

    let language: Language = resolve_language(&body.code, body.language.as_deref().unwrap_or("auto"))
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    let diagram: DiagramType = match body.diagram_type.as_deref() {
        Some(name) => name.parse().map_err(|e: codeviz_core::PipelineError| ApiError::bad_request(e.to_string()))?,
        None => DiagramType::default(),
    };

    let mut request = VisualizeRequest::new(body.code, language, diagram);
    request.max_depth = body.max_depth;
    Ok(request)
}

//! API request and response models.
//!
//! These are Data Transfer Objects (DTOs) that define the JSON shape of the
//! HTTP API.

use serde::{Deserialize, Serialize};

use codeviz_core::{CodeStats, Language, Visualization};

/// Body of `POST /api/visualize` and `POST /api/render`.
#[derive(Debug, Deserialize)]
pub struct VisualizeBody {
    pub code: String,
    /// `auto`, `python` or `java`. Missing means `auto`.
    #[serde(default)]
    pub language: Option<String>,
    /// `ast`, `cfg` or `ddg`. Missing means `ast`.
    #[serde(default)]
    pub diagram_type: Option<String>,
    #[serde(default)]
    pub max_depth: Option<usize>,
}

/// Successful response of `POST /api/visualize`.
#[derive(Debug, Serialize)]
pub struct VisualizeResponse {
    pub visualization: Visualization,
    pub code_stats: CodeStats,
    pub language_used: Language,
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

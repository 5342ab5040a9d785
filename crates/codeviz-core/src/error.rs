//! Pipeline error types.
//!
//! Only these errors ever reach a pipeline caller. Syntax errors, depth
//! truncation and per-node extraction failures are all recovered inside the
//! pipeline and reported through [`crate::Metadata`] and diagnostics.

use thiserror::Error;

/// Hard failures of a pipeline request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The requested language has no registered adapter.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The requested diagram type is not one of `ast`, `cfg` or `ddg`.
    #[error("Unknown diagram type: {0}")]
    UnsupportedDiagram(String),
}

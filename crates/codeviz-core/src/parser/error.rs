//! Adapter error types.

use thiserror::Error;

/// A hard syntax error in the submitted source.
///
/// Recovered by the pipeline into a placeholder graph; never returned to the
/// pipeline caller as an `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Syntax error at line {line}: {message}")]
pub struct ParseError {
    /// 1-based line of the first offending token.
    pub line: u32,
    /// Description of the failure.
    pub message: String,
}

impl ParseError {
    pub fn new(line: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Failure to extract a label or metadata from a single native node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// A required grammar field is absent (usually inside recovered syntax).
    #[error("`{kind}` node has no `{field}` field")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    /// The node's byte range does not map onto the source text.
    #[error("`{kind}` node text is out of range")]
    TextOutOfRange { kind: &'static str },

    /// The node has no name that could serve as a label.
    #[error("`{kind}` node has no resolvable name")]
    Unnamed { kind: &'static str },
}

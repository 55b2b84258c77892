//! Error types for semantic risk analysis

use thiserror::Error;

/// Error type for semantic risk analysis
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SemanticError {
    #[error("Generative model unavailable (primary: {primary}; fallback: {fallback})")]
    ModelUnavailable { primary: String, fallback: String },

    /// The model answered but the answer is not the expected structured document
    #[error("Malformed AI output: {message}")]
    MalformedOutput { message: String, raw: String },
}

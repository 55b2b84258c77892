//! Unified API error handling
//!
//! Every failure is rendered as `{error, message, request_id}` so callers can branch on
//! the `error` tag before reading assessment fields.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::service::{PipelineError, SemanticError};

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Bad request / validation error (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// No usable article content at the URL (422)
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// Generative model unreachable or answer unusable (502)
    #[error("External service error: {0}")]
    ExternalService(String),

    /// A mandatory signal is not configured (503)
    #[error("Service not configured: {0}")]
    NotConfigured(String),

    /// Run exceeded its time budget (504)
    #[error("Timed out: {0}")]
    Timeout(String),
}

impl ApiError {
    fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::ExtractionFailed(_) => "extraction_failed",
            ApiError::ExternalService(_) => "external_service_error",
            ApiError::NotConfigured(_) => "not_configured",
            ApiError::Timeout(_) => "timeout",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ExtractionFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = self.error_type();

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::ExtractionFailed(url) => {
                ApiError::ExtractionFailed(format!("unable to extract content from {url}"))
            }
            PipelineError::MissingConfig(key) => {
                ApiError::NotConfigured(format!("{key} is not set"))
            }
            PipelineError::Semantic(SemanticError::MalformedOutput { message, raw }) => {
                tracing::debug!(raw = %raw, "Malformed model output");
                ApiError::ExternalService(format!("malformed AI output: {message}"))
            }
            PipelineError::Semantic(e) => ApiError::ExternalService(e.to_string()),
            PipelineError::Timeout(step) => ApiError::Timeout(format!("{step} exceeded its budget")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_error_status_codes() {
        let cases = [
            (
                PipelineError::ExtractionFailed("https://a.fr".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                PipelineError::MissingConfig("GEMINI_API_KEY"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                PipelineError::Semantic(SemanticError::MalformedOutput {
                    message: "EOF".to_string(),
                    raw: "{".to_string(),
                }),
                StatusCode::BAD_GATEWAY,
            ),
            (PipelineError::Timeout("assessment"), StatusCode::GATEWAY_TIMEOUT),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn test_malformed_output_message() {
        let err = ApiError::from(PipelineError::Semantic(SemanticError::MalformedOutput {
            message: "EOF while parsing".to_string(),
            raw: "{".to_string(),
        }));
        assert_eq!(err.error_type(), "external_service_error");
        assert!(err.to_string().contains("malformed AI output"));
    }
}

//! REST API endpoint for credibility assessments

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use url::Url;
use utoipa::{OpenApi, ToSchema};

use crate::api::error::{ApiError, ErrorResponse};
use crate::api::health::{DependencyHealth, HealthStatus, ReadinessStatus};
use crate::model::fact_check::{ClaimPublisher, ClaimReview};
use crate::model::{
    AssessmentReport, ClaimRecord, ClaimStatus, ClaimSummary, ExtractionMethod, FinalAssessment,
    ReputationOrigin, ReputationVerdict, SemanticRisk, SourceStatus, Verdict,
};
use crate::service::CredibilityPipeline;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "News Credibility API",
        description = "Credibility scoring for news articles reachable by URL"
    ),
    paths(
        assess_article,
        crate::api::health::liveness,
        crate::api::health::readiness
    ),
    components(schemas(
        AssessmentRequest,
        AssessmentReport,
        FinalAssessment,
        Verdict,
        ClaimStatus,
        ClaimSummary,
        ClaimRecord,
        ClaimReview,
        ClaimPublisher,
        ExtractionMethod,
        ReputationVerdict,
        ReputationOrigin,
        SourceStatus,
        SemanticRisk,
        ErrorResponse,
        HealthStatus,
        ReadinessStatus,
        DependencyHealth
    )),
    tags(
        (name = "assessments", description = "Article credibility assessment"),
        (name = "health", description = "Service health probes")
    )
)]
pub struct ApiDoc;

/// Request body for an assessment
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssessmentRequest {
    /// Absolute http(s) URL of the article
    pub url: String,
}

/// Parse and check a user-supplied article URL
pub fn parse_article_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ApiError::BadRequest(format!("invalid URL '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        scheme => Err(ApiError::BadRequest(format!(
            "unsupported URL '{raw}' (scheme '{scheme}')"
        ))),
    }
}

/// Assess the credibility of a news article
#[utoipa::path(
    post,
    path = "/v1/assessments",
    request_body = AssessmentRequest,
    responses(
        (status = 200, description = "Assessment completed", body = AssessmentReport),
        (status = 400, description = "Invalid article URL", body = ErrorResponse),
        (status = 422, description = "Article content could not be extracted", body = ErrorResponse),
        (status = 502, description = "Semantic analysis failed", body = ErrorResponse),
        (status = 503, description = "Semantic analysis is not configured", body = ErrorResponse),
        (status = 504, description = "Assessment timed out", body = ErrorResponse)
    ),
    tag = "assessments"
)]
#[post("/v1/assessments")]
pub async fn assess_article(
    pipeline: web::Data<CredibilityPipeline>,
    request: web::Json<AssessmentRequest>,
) -> Result<HttpResponse, ApiError> {
    let url = parse_article_url(&request.url)?;
    let report = pipeline.assess(&url).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Configure assessment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(assess_article);
}

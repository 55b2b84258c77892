//! Health check endpoints for Kubernetes liveness and readiness probes

use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::service::CredibilityPipeline;

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadinessStatus {
    pub status: String,
    pub version: String,
    pub dependencies: DependencyHealth,
}

#[derive(Serialize, ToSchema)]
pub struct DependencyHealth {
    /// Generative model signal (mandatory)
    pub semantic: String,
    /// Claims index signal (optional)
    pub fact_check: String,
}

/// Liveness probe endpoint
///
/// Always returns 200 OK if the service is running.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive", body = HealthStatus)
    ),
    tag = "health"
)]
#[get("/health/live")]
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness probe endpoint
///
/// Ready only when the generative model key is configured, since no assessment can
/// complete without it. A missing claims-index key only disables that signal.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessStatus),
        (status = 503, description = "Service is not ready", body = ReadinessStatus)
    ),
    tag = "health"
)]
#[get("/health/ready")]
pub async fn readiness(pipeline: web::Data<CredibilityPipeline>) -> impl Responder {
    let ready = pipeline.semantic_enabled();
    let status = readiness_status(ready, pipeline.fact_check_enabled());

    if ready {
        HttpResponse::Ok().json(status)
    } else {
        tracing::warn!("Readiness check failed: semantic analysis not configured");
        HttpResponse::ServiceUnavailable().json(status)
    }
}

fn readiness_status(semantic_enabled: bool, fact_check_enabled: bool) -> ReadinessStatus {
    ReadinessStatus {
        status: if semantic_enabled { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dependencies: DependencyHealth {
            semantic: if semantic_enabled { "configured" } else { "missing_api_key" }.to_string(),
            fact_check: if fact_check_enabled { "enabled" } else { "disabled" }.to_string(),
        },
    }
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(liveness).service(readiness);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_status() {
        let ready = readiness_status(true, false);
        assert_eq!(ready.status, "ready");
        assert_eq!(ready.dependencies.fact_check, "disabled");

        let not_ready = readiness_status(false, true);
        assert_eq!(not_ready.status, "not_ready");
        assert_eq!(not_ready.dependencies.semantic, "missing_api_key");
        assert_eq!(not_ready.dependencies.fact_check, "enabled");
    }
}

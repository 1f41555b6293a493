//! Roadmap generator API: request/response contract and HTTP client.
//!
//! The orchestrator talks to the generator through `RoadmapApi` so tests
//! (and alternative transports) can stand in for the HTTP client.

pub mod client;
pub mod types;

use async_trait::async_trait;

pub use client::{ApiError, GeneratorClient, GENERIC_FAILURE};
pub use types::{GenerateRequest, GenerateResponse, HealthStatus};

#[async_trait]
pub trait RoadmapApi: Send + Sync {
    /// `POST /api/generate`. Non-2xx, unreadable bodies and transport
    /// failures are all errors.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError>;

    /// `GET /api/health`. Best-effort; callers only log the outcome.
    async fn health(&self) -> Result<HealthStatus, ApiError>;
}

/// Check generator health once and log the outcome. Never fails.
pub async fn log_health(api: &dyn RoadmapApi) {
    match api.health().await {
        Ok(health) => tracing::info!(
            status = %health.status,
            provider = health.provider.as_deref().unwrap_or("unknown"),
            "generator API reachable"
        ),
        Err(e) => tracing::warn!(error = %e, "generator API may not be running"),
    }
}

//! Wire types for the roadmap generator endpoints.

use serde::{Deserialize, Serialize};

use crate::roadmap::{Level, RoadmapDocument};

/// `POST /api/generate` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub domain: String,
    pub level: Level,
}

/// Successful `POST /api/generate` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerateResponse {
    pub roadmap: RoadmapDocument,
    /// Diagram source, usually fenced. May be absent.
    #[serde(default)]
    pub mermaid: String,
}

/// Failure body: `{"error": "..."}`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

/// `GET /api/health` body. Only logged.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub provider: Option<String>,
}

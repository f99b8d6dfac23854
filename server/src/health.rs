use crate::models::HealthStatus;
use axum::Json;

/// Liveness probe. Only proves the process can answer HTTP.
pub async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus::healthy())
}

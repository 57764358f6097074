//! Liveness and readiness checks.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadinessStatus {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Always 200 while the process is up.
pub async fn liveness() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// 200 when the database answers, 503 otherwise.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadinessStatus>) {
    let check = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        state.db.health_check(),
    )
    .await;

    let database = match check {
        Ok(Ok(())) => "healthy",
        Ok(Err(e)) => {
            tracing::error!(error = %e, "database health check failed");
            "unhealthy"
        }
        Err(_) => {
            tracing::error!("database health check timed out");
            "unhealthy"
        }
    };

    let (code, status) = if database == "healthy" {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    (
        code,
        Json(ReadinessStatus {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
        }),
    )
}

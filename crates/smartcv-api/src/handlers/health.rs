//! Health check handlers.

use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;

#[derive(serde::Serialize)]
struct HealthCheckResponse {
    status: String,
    database: String,
}

/// Health probe: process is up and the database answers.
pub async fn health_check(state: Arc<AppState>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let database =
        match tokio::time::timeout(TIMEOUT, sqlx::query("SELECT 1").execute(&state.pool)).await {
            Ok(Ok(_)) => "healthy".to_string(),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Database health check failed");
                format!("unhealthy: {}", e)
            }
            Err(_) => {
                tracing::error!("Database health check timed out");
                "timeout".to_string()
            }
        };

    let healthy = database == "healthy";
    let status = if healthy { "healthy" } else { "degraded" };

    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(HealthCheckResponse {
            status: status.to_string(),
            database,
        }),
    )
}

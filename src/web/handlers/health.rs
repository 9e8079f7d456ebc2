//! Health check handler

use axum::response::IntoResponse;

use crate::web::responses::{HealthResponse, ok};

/// Liveness only; upstream services are not probed
pub async fn health_check() -> impl IntoResponse {
    ok(HealthResponse::healthy())
}

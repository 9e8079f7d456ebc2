//! Analysis handlers

use axum::{
    Json,
    extract::State,
    response::Response,
};
use serde::Deserialize;
use tracing::info;

use crate::web::{
    AppState,
    extractors::{BearerCredential, RequestContext},
    responses::handle_result,
};

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    /// Watch URL, short link or bare video identifier
    pub reference: String,
}

/// POST /api/v1/analyses
pub async fn create_analysis(
    State(state): State<AppState>,
    context: RequestContext,
    BearerCredential(credential): BearerCredential,
    Json(request): Json<AnalysisRequest>,
) -> Response {
    info!(
        request_id = %context.request_id,
        user_agent = ?context.user_agent,
        real_ip = ?context.real_ip,
        "Analysis requested"
    );

    handle_result(state.service.analyze(&request.reference, &credential).await)
}

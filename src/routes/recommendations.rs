use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Algorithm, RecommendationBody, RecommendationRequest, RecommendationResponse},
    routes::AppState,
    services::recommend as run_engine,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationBody>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(body) = payload?;
    let algorithm: Algorithm = body.algorithm.parse()?;
    let top_n = body.top_n.unwrap_or(state.config.default_top_n);
    let request = RecommendationRequest::new(body.movies, top_n)?;

    tracing::info!(
        request_id = %request_id,
        algorithm = %algorithm,
        seeds = ?request.seeds,
        top_n,
        "Processing recommendation request"
    );

    let snapshot = state.snapshot().await;
    let outcome = tokio::task::spawn_blocking(move || run_engine(&snapshot, algorithm, &request))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let recommendations = outcome.map_err(|e| {
        tracing::warn!(request_id = %request_id, error = %e, "Recommendation failed");
        e
    })?;

    Ok(Json(RecommendationResponse {
        algorithm,
        recommendations,
    }))
}

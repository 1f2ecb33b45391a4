use axum::{extract::State, Extension, Json};

use crate::{
    error::AppResult, middleware::request_id::RequestId, models::StoreSummary, routes::AppState,
};

/// Reloads the stores from the configured data sources
pub async fn reload(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<StoreSummary>> {
    tracing::info!(request_id = %request_id, "Store reload requested");

    let summary = state.reload().await.map_err(|e| {
        tracing::error!(request_id = %request_id, error = %e, "Store reload failed");
        e
    })?;

    Ok(Json(summary))
}

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    models::TitleSummary,
    routes::AppState,
    services::title_search::{list_titles, search_titles, MAX_SEARCH_RESULTS},
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    offset: usize,
    #[serde(default = "default_list_limit")]
    limit: usize,
}

fn default_list_limit() -> usize {
    200
}

/// Handler for title search endpoint
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<TitleSummary>> {
    let snapshot = state.snapshot().await;
    let limit = params.limit.unwrap_or(MAX_SEARCH_RESULTS);
    Json(search_titles(&snapshot.catalog, &params.q, limit))
}

/// Handler for listing a window of catalog titles
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Json<Vec<String>> {
    let snapshot = state.snapshot().await;
    Json(list_titles(&snapshot.catalog, params.offset, params.limit))
}

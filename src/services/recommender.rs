use std::time::Instant;

use crate::{
    error::AppResult,
    models::{Algorithm, RecommendationRequest},
    store::StoreSnapshot,
};

use super::{collaborative_based::collab_model, content_based::content_model};

/// Runs the selected engine against a store snapshot.
///
/// Both engines share one contract: three seed titles in, at most `top_n`
/// titles out, best first, seeds excluded. Pure and CPU-bound.
pub fn recommend(
    snapshot: &StoreSnapshot,
    algorithm: Algorithm,
    request: &RecommendationRequest,
) -> AppResult<Vec<String>> {
    let start = Instant::now();

    let recommendations = match algorithm {
        Algorithm::ContentBased => content_model(&snapshot.catalog, &request.seeds, request.top_n),
        Algorithm::CollaborativeBased => collab_model(
            &snapshot.catalog,
            &snapshot.ratings,
            &snapshot.factors,
            &request.seeds,
            request.top_n,
        ),
    }?;

    tracing::info!(
        algorithm = %algorithm,
        top_n = request.top_n,
        returned = recommendations.len(),
        processing_time_ms = start.elapsed().as_millis(),
        "Recommendations generated"
    );

    Ok(recommendations)
}

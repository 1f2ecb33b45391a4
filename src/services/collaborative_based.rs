use crate::{
    error::{AppError, AppResult},
    models::SEED_COUNT,
    store::{cosine_similarity, CatalogStore, LatentFactors, RatingStore},
};

use super::ranking::{rank, resolve_seeds};

/// Recommends movies whose rating-behaviour embeddings lie close to the seeds.
///
/// Seeds without an embedding are cold-start and skipped; if none of them has
/// one the call fails with `InsufficientData`. A candidate scores the sum of
/// cosine similarities to the usable seed embeddings. Candidates without an
/// embedding are ranked after every embedded candidate, by id.
pub fn collab_model(
    catalog: &CatalogStore,
    ratings: &RatingStore,
    factors: &LatentFactors,
    seed_titles: &[String; SEED_COUNT],
    top_n: usize,
) -> AppResult<Vec<String>> {
    let seeds = resolve_seeds(catalog, seed_titles)?;

    let mut seed_embeddings: Vec<&[f32]> = Vec::with_capacity(seeds.len());
    for seed in &seeds {
        match factors.get(seed.movie.id) {
            Some(embedding) => seed_embeddings.push(embedding),
            None => tracing::warn!(
                movie_id = %seed.movie.id,
                title = %seed.movie.title,
                ratings = ratings.support(seed.movie.id),
                "Cold-start seed skipped"
            ),
        }
    }

    if seed_embeddings.is_empty() {
        let titles: Vec<&str> = seeds.iter().map(|s| s.movie.title.as_str()).collect();
        return Err(AppError::InsufficientData(format!(
            "Not enough rating history for any of {:?}; try content based filtering",
            titles
        )));
    }

    let scored = catalog.entries().flat_map(|candidate| {
        let contributions: Vec<f32> = match factors.get(candidate.movie.id) {
            Some(embedding) => seed_embeddings
                .iter()
                .map(|seed| cosine_similarity(seed, embedding))
                .collect(),
            None => vec![f32::NEG_INFINITY],
        };
        contributions
            .into_iter()
            .map(move |score| (candidate.movie.id, score))
    });

    Ok(rank(catalog, scored, &seeds, top_n))
}

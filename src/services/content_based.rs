use crate::{
    error::AppResult,
    models::SEED_COUNT,
    store::CatalogStore,
};

use super::ranking::{rank, resolve_seeds};

/// Recommends movies whose genres and keywords resemble the seeds.
///
/// Each candidate scores the sum of its cosine similarity to every seed, so a
/// movie close to all three favorites beats one close to a single favorite.
/// Candidates with no overlap at all still fill the list (ordered by id), so
/// the result holds `min(top_n, catalog_size - seeds)` titles.
pub fn content_model(
    catalog: &CatalogStore,
    seed_titles: &[String; SEED_COUNT],
    top_n: usize,
) -> AppResult<Vec<String>> {
    let seeds = resolve_seeds(catalog, seed_titles)?;

    tracing::debug!(
        seeds = ?seeds.iter().map(|s| s.movie.id).collect::<Vec<_>>(),
        candidates = catalog.len(),
        "Scoring content similarity"
    );

    let scored = catalog.entries().flat_map(|candidate| {
        seeds.iter().map(move |seed| {
            (
                candidate.movie.id,
                seed.features.cosine(&candidate.features),
            )
        })
    });

    Ok(rank(catalog, scored, &seeds, top_n))
}

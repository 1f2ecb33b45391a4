use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::{
    error::AppResult,
    models::MovieId,
    store::{CatalogEntry, CatalogStore},
};

/// Resolves seed titles to catalog entries before any scoring happens.
///
/// Fails on the first unknown title. A title given more than once counts as
/// a single seed.
pub fn resolve_seeds<'a>(
    catalog: &'a CatalogStore,
    seed_titles: &[String],
) -> AppResult<Vec<&'a CatalogEntry>> {
    let mut seeds: Vec<&CatalogEntry> = Vec::with_capacity(seed_titles.len());

    for title in seed_titles {
        let entry = catalog.resolve(title)?;
        if !seeds.iter().any(|s| s.movie.id == entry.movie.id) {
            seeds.push(entry);
        }
    }

    Ok(seeds)
}

/// Turns raw per-candidate scores into the final ordered title list.
///
/// Score contributions for the same id are summed, in input order. Seeds are
/// removed, candidates are ordered by score descending then id ascending,
/// titles equal to a seed title or already emitted are skipped, and the list
/// is cut at `top_n`. Ids missing from the catalog are ignored and NaN scores
/// rank last.
pub fn rank<I>(catalog: &CatalogStore, scored: I, seeds: &[&CatalogEntry], top_n: usize) -> Vec<String>
where
    I: IntoIterator<Item = (MovieId, f32)>,
{
    let seed_ids: HashSet<MovieId> = seeds.iter().map(|s| s.movie.id).collect();

    let mut merged: HashMap<MovieId, f32> = HashMap::new();
    for (id, score) in scored {
        if seed_ids.contains(&id) {
            continue;
        }
        let score = if score.is_nan() { f32::NEG_INFINITY } else { score };
        *merged.entry(id).or_insert(0.0) += score;
    }

    let mut ranked: Vec<(MovieId, f32)> = merged.into_iter().collect();
    ranked.sort_unstable_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut emitted: HashSet<&str> = seeds.iter().map(|s| s.movie.title.as_str()).collect();
    ranked
        .into_iter()
        .filter_map(|(id, _)| catalog.get(id))
        .filter(|&entry| emitted.insert(entry.movie.title.as_str()))
        .take(top_n)
        .map(|entry| entry.movie.title.clone())
        .collect()
}

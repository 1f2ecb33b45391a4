use crate::{models::TitleSummary, store::CatalogStore};

/// Upper bound on search results returned in one call
pub const MAX_SEARCH_RESULTS: usize = 50;

/// Case-insensitive substring search over catalog titles, in catalog order
pub fn search_titles(catalog: &CatalogStore, query: &str, limit: usize) -> Vec<TitleSummary> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    catalog
        .entries()
        .filter(|entry| entry.movie.title.to_lowercase().contains(&needle))
        .take(limit.min(MAX_SEARCH_RESULTS))
        .map(|entry| TitleSummary::from(&entry.movie))
        .collect()
}

/// A window of catalog titles, used to populate the favorite-movie pickers
pub fn list_titles(catalog: &CatalogStore, offset: usize, limit: usize) -> Vec<String> {
    catalog
        .entries()
        .skip(offset)
        .take(limit)
        .map(|entry| entry.movie.title.clone())
        .collect()
}

use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieId},
};

use super::features::{FeatureEncoder, FeatureVector};

/// A catalog movie together with its content vector
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub movie: Movie,
    pub features: FeatureVector,
}

/// Immutable in-memory index of the movie catalog
///
/// Entries keep the order they were loaded in. Lookups by id and by exact
/// title are O(1).
#[derive(Debug)]
pub struct CatalogStore {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<MovieId, usize>,
    by_title: HashMap<String, usize>,
    feature_dimensions: usize,
}

impl CatalogStore {
    pub fn new(movies: Vec<Movie>) -> AppResult<Self> {
        Self::with_encoder(movies, &FeatureEncoder::default())
    }

    /// Builds the catalog and encodes every movie's feature vector
    pub fn with_encoder(movies: Vec<Movie>, encoder: &FeatureEncoder) -> AppResult<Self> {
        let (vectors, feature_dimensions) = encoder.encode(&movies);

        let mut by_id = HashMap::with_capacity(movies.len());
        let mut by_title = HashMap::with_capacity(movies.len());
        let mut duplicate_titles = 0usize;

        for (position, movie) in movies.iter().enumerate() {
            if by_id.insert(movie.id, position).is_some() {
                return Err(AppError::DataLoad(format!(
                    "Duplicate movie id {} in catalog",
                    movie.id
                )));
            }
            if by_title.contains_key(&movie.title) {
                duplicate_titles += 1;
                tracing::debug!(movie_id = %movie.id, title = %movie.title, "Duplicate title, keeping first entry");
            } else {
                by_title.insert(movie.title.clone(), position);
            }
        }

        if duplicate_titles > 0 {
            tracing::warn!(
                count = duplicate_titles,
                "Catalog contains duplicate titles; lookups resolve to the first occurrence"
            );
        }

        let entries = movies
            .into_iter()
            .zip(vectors)
            .map(|(movie, features)| CatalogEntry { movie, features })
            .collect();

        Ok(Self {
            entries,
            by_id,
            by_title,
            feature_dimensions,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn feature_dimensions(&self) -> usize {
        self.feature_dimensions
    }

    /// All entries in load order
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn get(&self, id: MovieId) -> Option<&CatalogEntry> {
        self.by_id.get(&id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Exact title lookup
    pub fn resolve(&self, title: &str) -> AppResult<&CatalogEntry> {
        self.by_title
            .get(title)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| AppError::UnknownTitle(title.to_string()))
    }
}

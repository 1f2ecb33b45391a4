use std::time::Instant;

use crate::{config::Config, error::AppResult, models::StoreSummary};

pub mod catalog;
pub mod factors;
pub mod features;
pub mod loader;
pub mod ratings;

pub use catalog::{CatalogEntry, CatalogStore};
pub use factors::{cosine_similarity, FactorParams, LatentFactors};
pub use features::{FeatureEncoder, FeatureVector};
pub use ratings::RatingStore;

/// Read-only bundle of every store a recommendation is computed from
///
/// Built once at startup (or on reload) and shared behind an `Arc`; nothing
/// mutates it afterwards.
#[derive(Debug)]
pub struct StoreSnapshot {
    pub catalog: CatalogStore,
    pub ratings: RatingStore,
    pub factors: LatentFactors,
}

impl StoreSnapshot {
    /// Assembles a snapshot, dropping embeddings of movies outside the catalog
    pub fn from_parts(catalog: CatalogStore, ratings: RatingStore, mut factors: LatentFactors) -> Self {
        let dropped = factors.retain(|id| catalog.contains(id));
        if dropped > 0 {
            tracing::warn!(dropped, "Discarded embeddings for movies missing from the catalog");
        }

        Self {
            catalog,
            ratings,
            factors,
        }
    }

    /// Loads every configured data source. Blocking; call from a blocking context.
    ///
    /// Trains latent factors when no factors artifact is configured, so this
    /// belongs to startup only.
    pub fn load(config: &Config) -> AppResult<Self> {
        let start = Instant::now();

        let (catalog, ratings) = Self::load_catalog_and_ratings(config)?;
        let factors = match &config.factors_path {
            Some(path) => loader::load_factors(path)?,
            None => LatentFactors::train(&ratings, &config.factor_params())?,
        };

        let snapshot = Self::from_parts(catalog, ratings, factors);
        snapshot.log_loaded(start);
        Ok(snapshot)
    }

    /// Re-reads the data files behind a running service. Blocking.
    ///
    /// Never trains: without a factors artifact the embeddings of `current`
    /// are carried over, restricted to movies still in the catalog.
    pub fn reload(config: &Config, current: &StoreSnapshot) -> AppResult<Self> {
        let start = Instant::now();

        let (catalog, ratings) = Self::load_catalog_and_ratings(config)?;
        let factors = match &config.factors_path {
            Some(path) => loader::load_factors(path)?,
            None => {
                tracing::info!(
                    embeddings = current.factors.len(),
                    "No factors artifact configured, keeping current embeddings"
                );
                current.factors.clone()
            }
        };

        let snapshot = Self::from_parts(catalog, ratings, factors);
        snapshot.log_loaded(start);
        Ok(snapshot)
    }

    fn load_catalog_and_ratings(config: &Config) -> AppResult<(CatalogStore, RatingStore)> {
        let mut movies = loader::load_movies(&config.movies_path)?;
        if let Some(tags_path) = &config.tags_path {
            let tags = loader::load_tags(tags_path)?;
            loader::attach_tags(&mut movies, tags);
        }
        let catalog = CatalogStore::with_encoder(movies, &config.feature_encoder())?;
        let ratings = RatingStore::new(loader::load_ratings(&config.ratings_path)?);
        Ok((catalog, ratings))
    }

    fn log_loaded(&self, start: Instant) {
        tracing::info!(
            movies = self.catalog.len(),
            ratings = self.ratings.len(),
            users = self.ratings.user_count(),
            embeddings = self.factors.len(),
            load_time_ms = start.elapsed().as_millis(),
            "Stores loaded"
        );
    }

    pub fn summary(&self) -> StoreSummary {
        StoreSummary {
            movies: self.catalog.len(),
            ratings: self.ratings.len(),
            embeddings: self.factors.len(),
            feature_dimensions: self.catalog.feature_dimensions(),
            factor_dimensions: self.factors.dimensions(),
        }
    }
}

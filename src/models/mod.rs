use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::{AppError, AppResult};

pub mod movie;
pub mod rating;

pub use movie::{parse_genres, parse_release_year, Movie, MovieId};
pub use rating::Rating;

/// Number of favorite movies a recommendation is seeded with
pub const SEED_COUNT: usize = 3;

/// Recommendation strategy selected by the caller
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Similarity over genres and keywords
    ContentBased,
    /// Similarity over latent factors learned from community ratings
    CollaborativeBased,
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::ContentBased => write!(f, "content_based"),
            Algorithm::CollaborativeBased => write!(f, "collaborative_based"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "content_based" | "content" | "content based filtering" => Ok(Algorithm::ContentBased),
            "collaborative_based" | "collaborative" | "collaborative based filtering" => {
                Ok(Algorithm::CollaborativeBased)
            }
            other => Err(AppError::InvalidInput(format!("Unknown algorithm: {}", other))),
        }
    }
}

/// Validated recommendation request: exactly three seed titles and a positive count
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub seeds: [String; SEED_COUNT],
    pub top_n: usize,
}

impl RecommendationRequest {
    pub fn new(seeds: Vec<String>, top_n: usize) -> AppResult<Self> {
        if top_n == 0 {
            return Err(AppError::InvalidInput(
                "top_n must be at least 1".to_string(),
            ));
        }

        let count = seeds.len();
        let seeds: [String; SEED_COUNT] = seeds.try_into().map_err(|_| {
            AppError::InvalidInput(format!(
                "Expected exactly {} favorite movies, got {}",
                SEED_COUNT, count
            ))
        })?;

        Ok(Self { seeds, top_n })
    }
}

// ============================================================================
// API Types
// ============================================================================

/// Body of `POST /api/v1/recommendations`
#[derive(Debug, Deserialize)]
pub struct RecommendationBody {
    /// `content_based` or `collaborative_based` (the UI labels are accepted too)
    pub algorithm: String,
    pub movies: Vec<String>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// Ordered recommendations returned to the client
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub algorithm: Algorithm,
    pub recommendations: Vec<String>,
}

/// Catalog entry returned by title search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleSummary {
    pub id: MovieId,
    pub title: String,
    pub release_year: Option<i32>,
    pub genres: Vec<String>,
}

impl From<&Movie> for TitleSummary {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            release_year: movie.release_year,
            genres: movie.genres.clone(),
        }
    }
}

/// Sizes of the stores after a (re)load
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreSummary {
    pub movies: usize,
    pub ratings: usize,
    pub embeddings: usize,
    pub feature_dimensions: usize,
    pub factor_dimensions: usize,
}

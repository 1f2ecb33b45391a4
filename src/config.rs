use serde::Deserialize;

use crate::store::{FactorParams, FeatureEncoder};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// MovieLens-style movies.csv (movieId,title,genres)
    #[serde(default = "default_movies_path")]
    pub movies_path: String,

    /// MovieLens-style ratings.csv (userId,movieId,rating,timestamp)
    #[serde(default = "default_ratings_path")]
    pub ratings_path: String,

    /// Optional tags.csv used as free-text keywords for content features
    #[serde(default)]
    pub tags_path: Option<String>,

    /// Optional precomputed movie embeddings; factors are trained at startup when absent
    #[serde(default)]
    pub factors_path: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of recommendations returned when a request does not specify one
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Weight of each genre dimension relative to tag terms
    #[serde(default = "default_genre_weight")]
    pub genre_weight: f32,

    #[serde(default = "default_latent_dimensions")]
    pub latent_dimensions: usize,

    #[serde(default = "default_training_epochs")]
    pub training_epochs: usize,

    #[serde(default = "default_learning_rate")]
    pub learning_rate: f32,

    #[serde(default = "default_regularization")]
    pub regularization: f32,

    /// Minimum number of ratings a movie needs before it gets an embedding
    #[serde(default = "default_min_support")]
    pub min_support: usize,

    #[serde(default = "default_training_seed")]
    pub training_seed: u64,
}

fn default_movies_path() -> String {
    "resources/data/movies.csv".to_string()
}

fn default_ratings_path() -> String {
    "resources/data/ratings.csv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_top_n() -> usize {
    10
}

fn default_genre_weight() -> f32 {
    1.0
}

fn default_latent_dimensions() -> usize {
    32
}

fn default_training_epochs() -> usize {
    20
}

fn default_learning_rate() -> f32 {
    0.005
}

fn default_regularization() -> f32 {
    0.02
}

fn default_min_support() -> usize {
    3
}

fn default_training_seed() -> u64 {
    42
}

impl Default for Config {
    fn default() -> Self {
        Self {
            movies_path: default_movies_path(),
            ratings_path: default_ratings_path(),
            tags_path: None,
            factors_path: None,
            host: default_host(),
            port: default_port(),
            default_top_n: default_top_n(),
            genre_weight: default_genre_weight(),
            latent_dimensions: default_latent_dimensions(),
            training_epochs: default_training_epochs(),
            learning_rate: default_learning_rate(),
            regularization: default_regularization(),
            min_support: default_min_support(),
            training_seed: default_training_seed(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would make every request or the training run fail
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.default_top_n == 0 {
            anyhow::bail!("DEFAULT_TOP_N must be at least 1");
        }
        if self.latent_dimensions == 0 {
            anyhow::bail!("LATENT_DIMENSIONS must be at least 1");
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            anyhow::bail!("LEARNING_RATE must be a positive number, got {}", self.learning_rate);
        }
        if !(self.regularization.is_finite() && self.regularization >= 0.0) {
            anyhow::bail!("REGULARIZATION must be non-negative, got {}", self.regularization);
        }
        Ok(())
    }

    /// Matrix factorization settings used when no factors artifact is configured
    pub fn factor_params(&self) -> FactorParams {
        FactorParams {
            dimensions: self.latent_dimensions,
            epochs: self.training_epochs,
            learning_rate: self.learning_rate,
            regularization: self.regularization,
            min_support: self.min_support,
            seed: self.training_seed,
        }
    }

    pub fn feature_encoder(&self) -> FeatureEncoder {
        FeatureEncoder {
            genre_weight: self.genre_weight,
        }
    }
}

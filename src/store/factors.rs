use std::collections::HashMap;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    error::{AppError, AppResult},
    models::MovieId,
};

use super::ratings::RatingStore;

/// Hyperparameters for matrix factorization
#[derive(Debug, Clone, PartialEq)]
pub struct FactorParams {
    pub dimensions: usize,
    pub epochs: usize,
    pub learning_rate: f32,
    pub regularization: f32,
    /// Movies with fewer ratings than this get no embedding (cold start)
    pub min_support: usize,
    pub seed: u64,
}

impl Default for FactorParams {
    fn default() -> Self {
        Self {
            dimensions: 32,
            epochs: 20,
            learning_rate: 0.005,
            regularization: 0.02,
            min_support: 3,
            seed: 42,
        }
    }
}

/// Per-movie embeddings in rating-behaviour space
///
/// Every embedding has the same dimensionality. A missing entry means the
/// movie is cold-start for the collaborative engine.
#[derive(Debug, Clone, Default)]
pub struct LatentFactors {
    dimensions: usize,
    embeddings: HashMap<MovieId, Vec<f32>>,
}

impl LatentFactors {
    /// Wraps precomputed embeddings, checking that their dimensionality agrees
    pub fn from_embeddings(embeddings: HashMap<MovieId, Vec<f32>>) -> AppResult<Self> {
        let mut dimensions = None;

        for (movie_id, embedding) in &embeddings {
            if embedding.is_empty() {
                return Err(AppError::DataLoad(format!(
                    "Empty embedding for movie {}",
                    movie_id
                )));
            }
            if embedding.iter().any(|v| !v.is_finite()) {
                return Err(AppError::DataLoad(format!(
                    "Non-finite embedding value for movie {}",
                    movie_id
                )));
            }
            match dimensions {
                None => dimensions = Some(embedding.len()),
                Some(d) if d != embedding.len() => {
                    return Err(AppError::DataLoad(format!(
                        "Embedding for movie {} has {} dimensions, expected {}",
                        movie_id,
                        embedding.len(),
                        d
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            dimensions: dimensions.unwrap_or(0),
            embeddings,
        })
    }

    /// Learns movie embeddings with biased SGD matrix factorization.
    ///
    /// Deterministic for a given rating store and `params.seed`: factors are
    /// initialised from a seeded RNG and ratings are visited in store order.
    /// Fails with `DataLoad` when the optimisation diverges to non-finite values.
    pub fn train(ratings: &RatingStore, params: &FactorParams) -> AppResult<Self> {
        let samples: Vec<_> = ratings
            .ratings()
            .iter()
            .filter(|r| ratings.support(r.movie_id) >= params.min_support.max(1))
            .collect();

        if samples.is_empty() || params.dimensions == 0 {
            tracing::warn!(
                ratings = ratings.len(),
                min_support = params.min_support,
                "No ratings eligible for factorization"
            );
            return Ok(Self {
                dimensions: params.dimensions,
                embeddings: HashMap::new(),
            });
        }

        let mut users: HashMap<u32, usize> = HashMap::new();
        let mut movies: HashMap<MovieId, usize> = HashMap::new();
        let mut movie_order: Vec<MovieId> = Vec::new();
        for rating in &samples {
            let next = users.len();
            users.entry(rating.user_id).or_insert(next);
            if !movies.contains_key(&rating.movie_id) {
                movies.insert(rating.movie_id, movie_order.len());
                movie_order.push(rating.movie_id);
            }
        }

        let k = params.dimensions;
        let mut rng = StdRng::seed_from_u64(params.seed);
        let scale = 0.1;
        let mut user_factors: Vec<f32> = (0..users.len() * k)
            .map(|_| rng.gen_range(-scale..scale))
            .collect();
        let mut movie_factors: Vec<f32> = (0..movie_order.len() * k)
            .map(|_| rng.gen_range(-scale..scale))
            .collect();
        let mut user_bias = vec![0.0f32; users.len()];
        let mut movie_bias = vec![0.0f32; movie_order.len()];
        let global_mean =
            samples.iter().map(|r| r.rating as f64).sum::<f64>() as f32 / samples.len() as f32;

        let lr = params.learning_rate;
        let reg = params.regularization;

        for epoch in 0..params.epochs {
            let mut squared_error = 0.0f64;

            for rating in &samples {
                let u = users[&rating.user_id];
                let m = movies[&rating.movie_id];
                let pu = &mut user_factors[u * k..(u + 1) * k];
                let qm = &mut movie_factors[m * k..(m + 1) * k];

                let dot: f32 = pu.iter().zip(qm.iter()).map(|(a, b)| a * b).sum();
                let err = rating.rating - (global_mean + user_bias[u] + movie_bias[m] + dot);
                squared_error += (err * err) as f64;

                user_bias[u] += lr * (err - reg * user_bias[u]);
                movie_bias[m] += lr * (err - reg * movie_bias[m]);
                for (p, q) in pu.iter_mut().zip(qm.iter_mut()) {
                    let p_old = *p;
                    *p += lr * (err * *q - reg * *p);
                    *q += lr * (err * p_old - reg * *q);
                }
            }

            let rmse = (squared_error / samples.len() as f64).sqrt();
            if !rmse.is_finite() || movie_factors.iter().any(|v| !v.is_finite()) {
                tracing::error!(
                    epoch = epoch + 1,
                    learning_rate = lr,
                    regularization = reg,
                    "Factorization diverged"
                );
                return Err(AppError::DataLoad(format!(
                    "Matrix factorization diverged at epoch {} (learning_rate {}, regularization {})",
                    epoch + 1,
                    lr,
                    reg
                )));
            }

            tracing::debug!(epoch = epoch + 1, rmse, "Factorization epoch complete");
        }

        let embeddings = movie_order
            .iter()
            .enumerate()
            .map(|(m, id)| (*id, movie_factors[m * k..(m + 1) * k].to_vec()))
            .collect::<HashMap<_, _>>();

        tracing::info!(
            users = users.len(),
            movies = embeddings.len(),
            dimensions = k,
            epochs = params.epochs,
            "Latent factors trained"
        );

        Ok(Self {
            dimensions: k,
            embeddings,
        })
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    pub fn get(&self, movie_id: MovieId) -> Option<&[f32]> {
        self.embeddings.get(&movie_id).map(Vec::as_slice)
    }

    /// Drops embeddings whose movie is not accepted by `keep`, returning how many were removed
    pub fn retain(&mut self, mut keep: impl FnMut(MovieId) -> bool) -> usize {
        let before = self.embeddings.len();
        self.embeddings.retain(|id, _| keep(*id));
        before - self.embeddings.len()
    }
}

/// Cosine similarity of two dense vectors; 0 when either has zero magnitude
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

use std::collections::{HashMap, HashSet};

use crate::models::{MovieId, Rating};

/// Sparse user×movie rating table
///
/// Ratings are kept sorted by `(user_id, movie_id)` so that every pass over
/// them, including factor training, visits them in the same order.
#[derive(Debug, Default)]
pub struct RatingStore {
    ratings: Vec<Rating>,
    support: HashMap<MovieId, usize>,
    user_count: usize,
}

impl RatingStore {
    pub fn new(mut ratings: Vec<Rating>) -> Self {
        ratings.sort_by(|a, b| {
            a.user_id
                .cmp(&b.user_id)
                .then_with(|| a.movie_id.cmp(&b.movie_id))
        });

        let mut support = HashMap::new();
        for rating in &ratings {
            *support.entry(rating.movie_id).or_insert(0) += 1;
        }
        let user_count = ratings
            .iter()
            .map(|r| r.user_id)
            .collect::<HashSet<_>>()
            .len();

        Self {
            ratings,
            support,
            user_count,
        }
    }

    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn user_count(&self) -> usize {
        self.user_count
    }

    /// Number of ratings a movie received
    pub fn support(&self, movie_id: MovieId) -> usize {
        self.support.get(&movie_id).copied().unwrap_or(0)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MovieId;

/// A single user's rating of a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub user_id: u32,
    pub movie_id: MovieId,
    pub rating: f32,
    pub timestamp: DateTime<Utc>,
}

impl Rating {
    pub fn new(user_id: u32, movie_id: u32, rating: f32) -> Self {
        Self {
            user_id,
            movie_id: MovieId(movie_id),
            rating,
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

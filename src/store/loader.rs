//! CSV loaders for the MovieLens-style data files.
//!
//! Every failure (missing file, malformed row, bad value) surfaces as
//! [`AppError::DataLoad`] carrying the offending path.

use std::collections::HashMap;
use std::path::Path;

use chrono::DateTime;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{parse_genres, parse_release_year, Movie, MovieId, Rating},
};

use super::factors::LatentFactors;

#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(rename = "movieId")]
    movie_id: u32,
    title: String,
    #[serde(default)]
    genres: String,
}

#[derive(Debug, Deserialize)]
struct TagRecord {
    #[serde(rename = "movieId")]
    movie_id: u32,
    #[serde(default)]
    tag: String,
}

#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(rename = "userId")]
    user_id: u32,
    #[serde(rename = "movieId")]
    movie_id: u32,
    rating: f32,
    timestamp: i64,
}

fn load_error(path: &Path, err: impl std::fmt::Display) -> AppError {
    AppError::DataLoad(format!("{}: {}", path.display(), err))
}

fn open_reader(path: &Path) -> AppResult<csv::Reader<std::fs::File>> {
    csv::Reader::from_path(path).map_err(|e| load_error(path, e))
}

/// Loads `movies.csv` (`movieId,title,genres`) in file order
pub fn load_movies(path: impl AsRef<Path>) -> AppResult<Vec<Movie>> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;
    let mut movies = Vec::new();

    for result in reader.deserialize() {
        let record: MovieRecord = result.map_err(|e| load_error(path, e))?;
        let title = record.title.trim().to_string();
        movies.push(Movie {
            id: MovieId(record.movie_id),
            release_year: parse_release_year(&title),
            title,
            genres: parse_genres(&record.genres),
            tags: Vec::new(),
        });
    }

    tracing::info!(path = %path.display(), count = movies.len(), "Loaded movies");
    Ok(movies)
}

/// Ordered list of catalog titles, as offered to the user for picking favorites
pub fn load_movie_titles(path: impl AsRef<Path>) -> AppResult<Vec<String>> {
    Ok(load_movies(path)?.into_iter().map(|m| m.title).collect())
}

/// Loads `tags.csv` (`userId,movieId,tag,timestamp`) grouped by movie
pub fn load_tags(path: impl AsRef<Path>) -> AppResult<HashMap<MovieId, Vec<String>>> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;
    let mut tags: HashMap<MovieId, Vec<String>> = HashMap::new();
    let mut count = 0usize;

    for result in reader.deserialize() {
        let record: TagRecord = result.map_err(|e| load_error(path, e))?;
        let tag = record.tag.trim();
        if tag.is_empty() {
            continue;
        }
        tags.entry(MovieId(record.movie_id))
            .or_default()
            .push(tag.to_string());
        count += 1;
    }

    tracing::info!(path = %path.display(), tags = count, movies = tags.len(), "Loaded tags");
    Ok(tags)
}

/// Attaches loaded tags to their movies; tags for unknown movies are ignored
pub fn attach_tags(movies: &mut [Movie], mut tags: HashMap<MovieId, Vec<String>>) {
    for movie in movies.iter_mut() {
        if let Some(movie_tags) = tags.remove(&movie.id) {
            movie.tags.extend(movie_tags);
        }
    }

    if !tags.is_empty() {
        tracing::debug!(orphaned = tags.len(), "Tags reference movies missing from the catalog");
    }
}

/// Loads `ratings.csv` (`userId,movieId,rating,timestamp`)
pub fn load_ratings(path: impl AsRef<Path>) -> AppResult<Vec<Rating>> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;
    let mut ratings = Vec::new();

    for result in reader.deserialize() {
        let record: RatingRecord = result.map_err(|e| load_error(path, e))?;
        if !record.rating.is_finite() {
            return Err(load_error(
                path,
                format!("non-finite rating for movie {}", record.movie_id),
            ));
        }
        let timestamp = DateTime::from_timestamp(record.timestamp, 0).ok_or_else(|| {
            load_error(path, format!("invalid timestamp {}", record.timestamp))
        })?;

        ratings.push(Rating {
            user_id: record.user_id,
            movie_id: MovieId(record.movie_id),
            rating: record.rating,
            timestamp,
        });
    }

    tracing::info!(path = %path.display(), count = ratings.len(), "Loaded ratings");
    Ok(ratings)
}

/// Loads precomputed embeddings from a headerless CSV of `movieId,f0,f1,...`
pub fn load_factors(path: impl AsRef<Path>) -> AppResult<LatentFactors> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| load_error(path, e))?;

    let mut embeddings = HashMap::new();
    for result in reader.records() {
        let record = result.map_err(|e| load_error(path, e))?;
        let mut fields = record.iter();

        let movie_id: u32 = fields
            .next()
            .ok_or_else(|| load_error(path, "empty row"))?
            .trim()
            .parse()
            .map_err(|e| load_error(path, e))?;
        let embedding = fields
            .map(|v| v.trim().parse::<f32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| load_error(path, format!("movie {}: {}", movie_id, e)))?;

        if embeddings.insert(MovieId(movie_id), embedding).is_some() {
            return Err(load_error(
                path,
                format!("duplicate embedding for movie {}", movie_id),
            ));
        }
    }

    if embeddings.is_empty() {
        return Err(load_error(path, "no embeddings found"));
    }

    let factors = LatentFactors::from_embeddings(embeddings)
        .map_err(|e| load_error(path, e))?;
    tracing::info!(
        path = %path.display(),
        movies = factors.len(),
        dimensions = factors.dimensions(),
        "Loaded latent factors"
    );
    Ok(factors)
}

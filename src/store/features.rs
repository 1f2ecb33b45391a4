use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::Movie;

/// Sparse, L2-normalised content vector of a movie
///
/// Entries are `(dimension, weight)` pairs sorted by dimension. A movie with
/// no genres and no tags has an empty vector, whose similarity to anything is 0.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    entries: Vec<(u32, f32)>,
}

impl FeatureVector {
    /// Builds a normalised vector from raw weights; zero weights are dropped
    pub fn from_weights(weights: BTreeMap<u32, f32>) -> Self {
        let norm = weights.values().map(|w| w * w).sum::<f32>().sqrt();
        if norm == 0.0 {
            return Self::default();
        }

        let entries = weights
            .into_iter()
            .filter(|(_, w)| *w != 0.0)
            .map(|(dim, w)| (dim, w / norm))
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[(u32, f32)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cosine similarity; both vectors are unit length so this is a sparse dot product
    pub fn cosine(&self, other: &FeatureVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0f32;

        while i < self.entries.len() && j < other.entries.len() {
            let (a_dim, a_w) = self.entries[i];
            let (b_dim, b_w) = other.entries[j];
            match a_dim.cmp(&b_dim) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }

        dot.clamp(-1.0, 1.0)
    }
}

/// Encodes movie metadata as multi-hot genres followed by TF-IDF tag terms
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    pub genre_weight: f32,
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self { genre_weight: 1.0 }
    }
}

impl FeatureEncoder {
    /// Encodes every movie against a vocabulary built from the whole catalog.
    ///
    /// Returns one vector per movie (same order as `movies`) and the
    /// vocabulary size, which is the dimensionality shared by all vectors.
    pub fn encode(&self, movies: &[Movie]) -> (Vec<FeatureVector>, usize) {
        let genres: BTreeSet<&str> = movies
            .iter()
            .flat_map(|m| m.genres.iter().map(String::as_str))
            .collect();

        let term_counts: Vec<BTreeMap<String, u32>> = movies
            .iter()
            .map(|m| {
                let mut counts = BTreeMap::new();
                for term in m.tags.iter().flat_map(|tag| tokenize(tag)) {
                    *counts.entry(term).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let mut document_frequency: BTreeMap<&str, u32> = BTreeMap::new();
        for counts in &term_counts {
            for term in counts.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let genre_index: HashMap<&str, u32> = genres
            .iter()
            .enumerate()
            .map(|(i, g)| (*g, i as u32))
            .collect();
        let offset = genre_index.len() as u32;
        let term_index: HashMap<&str, u32> = document_frequency
            .keys()
            .enumerate()
            .map(|(i, t)| (*t, offset + i as u32))
            .collect();

        // Smoothed IDF, always positive
        let n = movies.len() as f32;
        let idf = |df: u32| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0;

        let vectors = movies
            .iter()
            .zip(&term_counts)
            .map(|(movie, counts)| {
                let mut weights = BTreeMap::new();
                for genre in &movie.genres {
                    weights.insert(genre_index[genre.as_str()], self.genre_weight);
                }
                for (term, tf) in counts {
                    let df = document_frequency[term.as_str()];
                    weights.insert(term_index[term.as_str()], *tf as f32 * idf(df));
                }
                FeatureVector::from_weights(weights)
            })
            .collect();

        (vectors, genre_index.len() + term_index.len())
    }
}

/// Lowercased alphanumeric terms of at least two characters
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_tokenize() {
        let terms: Vec<String> = tokenize("Sci-Fi, time travel! a").collect();
        assert_eq!(terms, vec!["sci", "fi", "time", "travel"]);
    }

    #[test]
    fn test_identical_metadata_has_similarity_one() {
        let movies = vec![
            Movie::new(1, "Alien (1979)", &["Horror", "Sci-Fi"]),
            Movie::new(2, "Aliens (1986)", &["Horror", "Sci-Fi"]),
        ];
        let (vectors, dims) = FeatureEncoder::default().encode(&movies);

        assert_eq!(dims, 2);
        assert!(approx(vectors[0].cosine(&vectors[1]), 1.0));
    }

    #[test]
    fn test_disjoint_metadata_has_similarity_zero() {
        let movies = vec![
            Movie::new(1, "Alien (1979)", &["Horror"]),
            Movie::new(2, "Toy Story (1995)", &["Animation"]),
        ];
        let (vectors, _) = FeatureEncoder::default().encode(&movies);

        assert_eq!(vectors[0].cosine(&vectors[1]), 0.0);
    }

    #[test]
    fn test_tags_extend_the_vocabulary() {
        let movies = vec![
            Movie::new(1, "Heat (1995)", &["Crime"]).with_tags(&["heist", "Al Pacino"]),
            Movie::new(2, "Ronin (1998)", &["Crime"]).with_tags(&["heist"]),
            Movie::new(3, "Casino (1995)", &["Crime"]),
        ];
        let (vectors, dims) = FeatureEncoder::default().encode(&movies);

        // crime + {al, heist, pacino}
        assert_eq!(dims, 4);
        let heat_ronin = vectors[0].cosine(&vectors[1]);
        let heat_casino = vectors[0].cosine(&vectors[2]);
        assert!(heat_ronin > heat_casino);
        assert!(heat_casino > 0.0);
    }

    #[test]
    fn test_movie_without_metadata_has_empty_vector() {
        let movies = vec![
            Movie::new(1, "Untitled", &[]),
            Movie::new(2, "Heat (1995)", &["Crime"]),
        ];
        let (vectors, _) = FeatureEncoder::default().encode(&movies);

        assert!(vectors[0].is_empty());
        assert_eq!(vectors[0].cosine(&vectors[1]), 0.0);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let movies = vec![
            Movie::new(1, "Heat (1995)", &["Crime", "Thriller"]).with_tags(&["heist", "heist", "la"]),
            Movie::new(2, "Ronin (1998)", &["Action"]).with_tags(&["car chase"]),
        ];
        let (vectors, _) = FeatureEncoder::default().encode(&movies);

        for vector in &vectors {
            let norm: f32 = vector.entries().iter().map(|(_, w)| w * w).sum();
            assert!(approx(norm, 1.0));
        }
    }
}

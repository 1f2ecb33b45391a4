use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Catalog identifier of a movie (MovieLens `movieId`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u32);

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A movie in the catalog with the metadata content features are built from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub release_year: Option<i32>,
    pub genres: Vec<String>,
    /// Free-text keywords (user tags, plot keywords)
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Movie {
    pub fn new(id: u32, title: impl Into<String>, genres: &[&str]) -> Self {
        let title = title.into();
        Self {
            id: MovieId(id),
            release_year: parse_release_year(&title),
            title,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }
}

/// Extracts the year from a MovieLens title such as `"Heat (1995)"`
pub fn parse_release_year(title: &str) -> Option<i32> {
    let trimmed = title.trim_end();
    let inner = trimmed.strip_suffix(')')?;
    let open = inner.rfind('(')?;
    let year = &inner[open + 1..];

    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        year.parse().ok()
    } else {
        None
    }
}

/// Splits a `|`-separated MovieLens genre field
pub fn parse_genres(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != "(no genres listed)")
        .map(str::to_string)
        .collect()
}

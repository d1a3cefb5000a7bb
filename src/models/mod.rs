use serde::{Deserialize, Serialize};

/// A `{"name": ...}` entry from the genre or cast lists of a movie row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedEntry {
    pub name: String,
}

/// One row of the full movie table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub title: String,
    #[serde(default)]
    pub genres: Vec<NamedEntry>,
    #[serde(default)]
    pub cast: Vec<NamedEntry>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: f64,
}

impl Movie {
    /// Case-insensitive check against the movie's genre names
    pub fn has_genre(&self, genre_lower: &str) -> bool {
        self.genres
            .iter()
            .any(|g| g.name.to_lowercase() == genre_lower)
    }

    /// Case-insensitive check against the movie's cast names
    pub fn has_cast_member(&self, name_lower: &str) -> bool {
        self.cast.iter().any(|c| c.name.to_lowercase() == name_lower)
    }
}

/// A recommended title with its poster, when one could be found
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub poster_path: Option<String>,
}

/// Body of every recommendation endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

/// Entry of the popular-movies banner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopularMovie {
    pub title: String,
    pub poster_path: String,
}

// ============================================================================
// TMDb API Types
// ============================================================================

/// Paged result list returned by TMDb search and listing endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

/// Movie entry inside a TMDb result page
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

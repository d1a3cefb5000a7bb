//! Precomputed model artifacts
//!
//! All tables are produced offline and loaded once at startup from JSON files
//! in the configured data directory. Nothing here is mutated afterwards, so the
//! whole bundle is shared between handlers behind an `Arc`.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::{fs::File, io::BufReader, path::Path};

pub mod catalog;
pub mod collaborative;
pub mod content;

pub use catalog::MovieCatalog;
pub use collaborative::{
    CollaborativeData, CollaborativeModel, CollaborativeMovie, FactorEntry, Rating, RatingsTable,
};
pub use content::ContentModel;

pub const MOVIES_FILE: &str = "movies.json";
pub const CONTENT_MODEL_FILE: &str = "content_model.json";
pub const COLLAB_MODEL_FILE: &str = "collaborative_model.json";
pub const COLLAB_MOVIES_FILE: &str = "collaborative_movies.json";
pub const COLLAB_RATINGS_FILE: &str = "collaborative_ratings.json";

/// Every table the recommendation endpoints read from
pub struct Artifacts {
    pub catalog: MovieCatalog,
    pub content: ContentModel,
    pub collaborative: CollaborativeData,
    pub loaded_at: DateTime<Utc>,
}

impl Artifacts {
    pub fn new(
        catalog: MovieCatalog,
        content: ContentModel,
        collaborative: CollaborativeData,
    ) -> Self {
        Self {
            catalog,
            content,
            collaborative,
            loaded_at: Utc::now(),
        }
    }

    /// Loads all artifacts from `data_dir`
    pub fn load(data_dir: &Path) -> anyhow::Result<Self> {
        let catalog = MovieCatalog::new(read_json(&data_dir.join(MOVIES_FILE))?);
        let content: ContentModel = read_json(&data_dir.join(CONTENT_MODEL_FILE))?;
        let collaborative = CollaborativeData::new(
            read_json(&data_dir.join(COLLAB_MODEL_FILE))?,
            read_json(&data_dir.join(COLLAB_MOVIES_FILE))?,
            read_json(&data_dir.join(COLLAB_RATINGS_FILE))?,
        );

        tracing::info!(
            data_dir = %data_dir.display(),
            movies = catalog.movies().len(),
            actors = catalog.actor_names().len(),
            content_titles = content.titles().len(),
            users = collaborative.ratings.user_count(),
            rated_movies = collaborative.ratings.movie_ids().len(),
            "Artifacts loaded"
        );

        Ok(Self::new(catalog, content, collaborative))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Movie metadata provider abstraction
///
/// Posters and the popular-movies listing come from an external metadata
/// service. Handlers only see this trait, so tests and alternative backends
/// can stand in for TMDb.
use crate::{error::AppResult, models::PopularMovie};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for poster and listing providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Full poster URL for the best search hit on `title`
    ///
    /// `Ok(None)` means the provider answered but had no poster.
    async fn poster_for(&self, title: &str) -> AppResult<Option<String>>;

    /// Currently popular movies that have a poster, at most 15
    async fn popular_movies(&self) -> AppResult<Vec<PopularMovie>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

use std::sync::Arc;

use crate::{
    artifacts::Artifacts,
    error::{AppError, AppResult},
    services::providers::PosterProvider,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub artifacts: Arc<Artifacts>,
    pub posters: Arc<dyn PosterProvider>,
}

impl AppState {
    pub fn new(artifacts: Artifacts, posters: Arc<dyn PosterProvider>) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
            posters,
        }
    }

    /// Runs CPU-bound work over the artifacts off the async worker threads
    pub async fn with_artifacts<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Artifacts) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let artifacts = self.artifacts.clone();
        tokio::task::spawn_blocking(move || f(&artifacts))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

use std::sync::Arc;

use crate::{models::Recommendation, services::providers::PosterProvider};

/// Attaches a poster URL to each title, preserving order
///
/// Lookups run concurrently. A failed lookup is logged and yields a `null`
/// poster instead of failing the whole response.
pub async fn with_posters(
    provider: Arc<dyn PosterProvider>,
    titles: Vec<String>,
) -> Vec<Recommendation> {
    let mut tasks = Vec::with_capacity(titles.len());

    for title in titles {
        let provider = provider.clone();
        let lookup_title = title.clone();
        let task = tokio::spawn(async move { provider.poster_for(&lookup_title).await });
        tasks.push((title, task));
    }

    let mut recommendations = Vec::with_capacity(tasks.len());
    let mut failures = 0;

    for (title, task) in tasks {
        let poster_path = match task.await {
            Ok(Ok(poster)) => poster,
            Ok(Err(e)) => {
                failures += 1;
                tracing::warn!(
                    title = %title,
                    provider = provider.name(),
                    error = %e,
                    "Poster lookup failed"
                );
                None
            }
            Err(e) => {
                failures += 1;
                tracing::error!(title = %title, error = %e, "Poster lookup task join error");
                None
            }
        };

        recommendations.push(Recommendation { title, poster_path });
    }

    if failures > 0 {
        tracing::warn!(
            total = recommendations.len(),
            failures,
            "Some posters could not be fetched"
        );
    }

    recommendations
}

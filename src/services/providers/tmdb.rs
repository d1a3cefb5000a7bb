/// TMDb (The Movie Database) provider
///
/// API Flow:
/// 1. Poster: /search/movie?query={title} → first result's `poster_path`
/// 2. Popular: /movie/popular?language=en-US&page=1 → first 15 results with a poster
///
/// `poster_path` values are relative; they are joined onto the configured image
/// base URL (w500 size by default).
use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::{AppError, AppResult},
    models::{PopularMovie, TmdbPage},
    services::providers::PosterProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const POPULAR_LIMIT: usize = 15;
const POPULAR_CACHE_TTL: u64 = 3600; // 1 hour
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    image_base_url: String,
    cache: Option<Cache>,
    poster_cache_ttl: u64,
}

impl TmdbProvider {
    /// Creates a provider without caching
    ///
    /// A missing `api_key` is allowed: every call then fails with
    /// `AppError::ExternalApi`, which poster enrichment turns into `null`.
    pub fn new(api_key: Option<String>, api_url: String, image_base_url: String) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        let api_key = api_key.filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("TMDB_API_KEY is not set, posters will be unavailable");
        }

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
            cache: None,
            poster_cache_ttl: 0,
        })
    }

    /// Enables Redis caching of poster lookups and the popular listing
    pub fn with_cache(mut self, cache: Cache, poster_cache_ttl: u64) -> Self {
        self.cache = Some(cache);
        self.poster_cache_ttl = poster_cache_ttl;
        self
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::ExternalApi("TMDb API key is not configured".to_string()))
    }

    /// Joins a relative `poster_path` onto the image base URL
    fn image_url(&self, poster_path: &str) -> Option<String> {
        let poster_path = poster_path.trim();
        if poster_path.is_empty() {
            return None;
        }
        Some(format!("{}{}", self.image_base_url, poster_path))
    }

    async fn get_page(&self, path: &str, query: &[(&str, &str)]) -> AppResult<TmdbPage> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key()?)])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDb API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize TMDb response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDb response: {}", e))
        })
    }

    async fn search_poster(&self, title: &str) -> AppResult<Option<String>> {
        let page = self.get_page("/search/movie", &[("query", title)]).await?;

        let poster = page
            .results
            .first()
            .and_then(|movie| movie.poster_path.as_deref())
            .and_then(|path| self.image_url(path));

        tracing::debug!(
            title = %title,
            found = poster.is_some(),
            provider = "tmdb",
            "Poster search completed"
        );

        Ok(poster)
    }

    async fn fetch_popular(&self) -> AppResult<Vec<PopularMovie>> {
        let page = self
            .get_page("/movie/popular", &[("language", "en-US"), ("page", "1")])
            .await?;

        let movies: Vec<PopularMovie> = page
            .results
            .into_iter()
            .take(POPULAR_LIMIT)
            .filter_map(|movie| {
                let poster_path = self.image_url(movie.poster_path.as_deref()?)?;
                Some(PopularMovie {
                    title: movie.title?,
                    poster_path,
                })
            })
            .collect();

        tracing::info!(
            results = movies.len(),
            provider = "tmdb",
            "Popular movies fetched"
        );

        Ok(movies)
    }
}

#[async_trait::async_trait]
impl PosterProvider for TmdbProvider {
    async fn poster_for(&self, title: &str) -> AppResult<Option<String>> {
        if title.trim().is_empty() {
            return Ok(None);
        }

        cached!(
            self.cache,
            CacheKey::Poster(title.to_string()),
            self.poster_cache_ttl,
            self.search_poster(title)
        )
    }

    async fn popular_movies(&self) -> AppResult<Vec<PopularMovie>> {
        cached!(
            self.cache,
            CacheKey::PopularMovies,
            POPULAR_CACHE_TTL,
            self.fetch_popular()
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Query,
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    /// Serves a minimal stand-in for the TMDb endpoints and returns its base URL
    async fn spawn_fake_tmdb() -> String {
        async fn search(Query(params): Query<HashMap<String, String>>) -> Response {
            if params.get("api_key").map(String::as_str) != Some("test_key") {
                return (StatusCode::UNAUTHORIZED, "invalid api key").into_response();
            }
            let results = match params.get("query").map(String::as_str) {
                Some("Heat") => json!([
                    {"title": "Heat", "poster_path": "/heat.jpg"},
                    {"title": "Heat 2", "poster_path": "/heat2.jpg"}
                ]),
                Some("No Poster") => json!([{"title": "No Poster", "poster_path": null}]),
                _ => json!([]),
            };
            Json(json!({"page": 1, "results": results})).into_response()
        }

        async fn popular() -> Json<serde_json::Value> {
            let mut results = vec![json!({"title": "Poster-less", "poster_path": null})];
            for i in 0..20 {
                results.push(json!({"title": format!("Movie {}", i), "poster_path": format!("/{}.jpg", i)}));
            }
            Json(json!({"page": 1, "results": results}))
        }

        let app = Router::new()
            .route("/search/movie", get(search))
            .route("/movie/popular", get(popular));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn create_test_provider(api_url: String, api_key: Option<&str>) -> TmdbProvider {
        TmdbProvider::new(
            api_key.map(str::to_string),
            api_url,
            "https://image.tmdb.org/t/p/w500/".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_image_url_joins_base() {
        let provider = create_test_provider("http://test.local".to_string(), Some("k"));
        assert_eq!(
            provider.image_url("/abc.jpg"),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg".to_string())
        );
        assert_eq!(provider.image_url(""), None);
    }

    #[test]
    fn test_blank_api_key_is_treated_as_missing() {
        let provider = create_test_provider("http://test.local".to_string(), Some("  "));
        assert!(matches!(provider.api_key(), Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_poster_for_uses_first_result() {
        let provider = create_test_provider(spawn_fake_tmdb().await, Some("test_key"));
        let poster = provider.poster_for("Heat").await.unwrap();
        assert_eq!(
            poster,
            Some("https://image.tmdb.org/t/p/w500/heat.jpg".to_string())
        );
    }

    #[tokio::test]
    async fn test_poster_for_without_poster_path() {
        let provider = create_test_provider(spawn_fake_tmdb().await, Some("test_key"));
        assert_eq!(provider.poster_for("No Poster").await.unwrap(), None);
        assert_eq!(provider.poster_for("Unknown Film").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_poster_for_surfaces_upstream_errors() {
        let provider = create_test_provider(spawn_fake_tmdb().await, Some("wrong_key"));
        let err = provider.poster_for("Heat").await.unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(msg) if msg.contains("401")));
    }

    #[tokio::test]
    async fn test_poster_for_without_api_key_fails() {
        let provider = create_test_provider(spawn_fake_tmdb().await, None);
        assert!(provider.poster_for("Heat").await.is_err());
    }

    #[tokio::test]
    async fn test_popular_movies_limits_and_skips_missing_posters() {
        let provider = create_test_provider(spawn_fake_tmdb().await, Some("test_key"));
        let movies = provider.popular_movies().await.unwrap();

        // First 15 results, one of which has no poster
        assert_eq!(movies.len(), 14);
        assert_eq!(movies[0].title, "Movie 0");
        assert_eq!(
            movies[0].poster_path,
            "https://image.tmdb.org/t/p/w500/0.jpg"
        );
    }
}

use axum::{
    extract::State,
    middleware,
    routing::get,
    Extension, Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::{make_span_with_request_id, request_id_middleware, RequestId},
    models::PopularMovie,
};

pub mod discovery;
pub mod recommendations;
pub mod state;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/popular-movies", get(popular_movies))
        .route("/recommend", get(recommendations::recommend))
        .route(
            "/collaborative-recommend",
            get(recommendations::collaborative_recommend),
        )
        .route("/actor-movies", get(discovery::actor_movies))
        .route("/genre-movies", get(discovery::genre_movies))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// Rejects a missing or blank query parameter with a 400
pub(crate) fn require_param(value: Option<String>, name: &str) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::InvalidInput(format!(
            "A '{}' query parameter is required.",
            name
        ))),
    }
}

/// Liveness endpoint
async fn index() -> &'static str {
    "Movie Recommendation API is running!"
}

/// Health check endpoint with artifact sizes
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let artifacts = &state.artifacts;
    Json(json!({
        "status": "healthy",
        "movies": artifacts.catalog.movies().len(),
        "content_titles": artifacts.content.titles().len(),
        "users": artifacts.collaborative.ratings.user_count(),
        "loaded_at": artifacts.loaded_at,
    }))
}

/// Handler for the popular-movies banner
async fn popular_movies(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<Vec<PopularMovie>>> {
    let movies = state.posters.popular_movies().await?;

    tracing::info!(
        request_id = %request_id,
        results = movies.len(),
        "Popular movies served"
    );

    Ok(Json(movies))
}

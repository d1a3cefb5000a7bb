use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::RecommendationsResponse,
    routes::{require_param, AppState},
    services::{discovery, posters},
};

#[derive(Debug, Deserialize)]
pub struct ActorQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenreQuery {
    pub genre: Option<String>,
}

/// Handler for an actor's best-rated movies
pub async fn actor_movies(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<ActorQuery>,
) -> AppResult<Json<RecommendationsResponse>> {
    let name = require_param(params.name, "name")?;

    tracing::info!(request_id = %request_id, name = %name, "Processing actor request");

    let titles = state
        .with_artifacts(move |artifacts| discovery::movies_for_actor(&artifacts.catalog, &name))
        .await?;

    let recommendations = posters::with_posters(state.posters.clone(), titles).await;
    Ok(Json(RecommendationsResponse { recommendations }))
}

/// Handler for a genre's best-rated movies
pub async fn genre_movies(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<GenreQuery>,
) -> AppResult<Json<RecommendationsResponse>> {
    let genre = require_param(params.genre, "genre")?;

    tracing::info!(request_id = %request_id, genre = %genre, "Processing genre request");

    let titles = state
        .with_artifacts(move |artifacts| discovery::movies_for_genre(&artifacts.catalog, &genre))
        .await?;

    let recommendations = posters::with_posters(state.posters.clone(), titles).await;
    Ok(Json(RecommendationsResponse { recommendations }))
}

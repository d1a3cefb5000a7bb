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
    services::{posters, recommendations},
};

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Handler for content-based recommendations
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<TitleQuery>,
) -> AppResult<Json<RecommendationsResponse>> {
    let title = require_param(params.title, "title")?;

    tracing::info!(request_id = %request_id, title = %title, "Processing recommend request");

    let titles = state
        .with_artifacts(move |artifacts| {
            recommendations::recommend_similar(&artifacts.content, &title)
        })
        .await?;

    let recommendations = posters::with_posters(state.posters.clone(), titles).await;
    Ok(Json(RecommendationsResponse { recommendations }))
}

/// Handler for collaborative-filtering recommendations
pub async fn collaborative_recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<UserQuery>,
) -> AppResult<Json<RecommendationsResponse>> {
    let raw = require_param(params.user_id, "userId")?;
    let user_id = recommendations::parse_user_id(&raw)?;

    tracing::info!(
        request_id = %request_id,
        user_id,
        "Processing collaborative recommend request"
    );

    let titles = state
        .with_artifacts(move |artifacts| {
            recommendations::recommend_for_user(&artifacts.collaborative, user_id)
        })
        .await?;

    let recommendations = posters::with_posters(state.posters.clone(), titles).await;
    Ok(Json(RecommendationsResponse { recommendations }))
}

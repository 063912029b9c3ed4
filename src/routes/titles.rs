use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{MediaType, MoviePage},
    routes::AppState,
    services::titles::{self, DetailsResponse},
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type", default)]
    media_type: MediaType,
    #[serde(default = "first_page")]
    page: u32,
}

fn first_page() -> u32 {
    1
}

/// Movie details with trailer key
pub async fn movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Json<DetailsResponse>> {
    let response = titles::details(state.catalog.clone(), MediaType::Movie, id).await?;
    Ok(Json(response))
}

/// Movie or TV details with trailer key and streaming providers
pub async fn details(
    State(state): State<Arc<AppState>>,
    Path((media_type, id)): Path<(MediaType, u64)>,
) -> AppResult<Json<DetailsResponse>> {
    let response =
        titles::details_with_providers(state.catalog.clone(), media_type, id, &state.watch_region)
            .await?;
    Ok(Json(response))
}

pub async fn trending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<MoviePage>> {
    let page = titles::trending(state.catalog.clone(), params.media_type, params.page).await?;
    Ok(Json(page))
}

pub async fn top_rated(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<MoviePage>> {
    let page = titles::top_rated(state.catalog.clone(), params.media_type, params.page).await?;
    Ok(Json(page))
}

use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    routes::AppState,
    services::search::{self, SearchRequest, SearchResponse},
};

/// Handler for free-text search with mood and trending fallbacks
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SearchRequest>,
) -> AppResult<Json<SearchResponse>> {
    tracing::info!(
        request_id = %request_id,
        query = %request.query,
        languages = ?request.languages,
        "Processing search request"
    );

    let response =
        search::search(state.catalog.clone(), &state.recommend_options, request).await?;

    Ok(Json(response))
}

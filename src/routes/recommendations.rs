use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    routes::AppState,
    services::{
        mood::{self, Mood},
        recommendations::{self, RecommendRequest, RecommendResponse},
    },
};

/// Handler for the mood recommendation endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<RecommendResponse>> {
    tracing::info!(
        request_id = %request_id,
        mood = %request.mood,
        media_type = %request.media_type,
        page = ?request.page,
        "Processing recommend request"
    );

    let response =
        recommendations::recommend(state.catalog.clone(), &state.recommend_options, request)
            .await?;

    Ok(Json(response))
}

/// Lists the mood table so clients can offer suggestions
pub async fn moods() -> Json<&'static [Mood]> {
    Json(mood::all())
}

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    db::favorites,
    error::{AppError, AppResult},
    models::Favorite,
    routes::AppState,
};

/// Saves a favorite; saving the same id twice is a no-op
pub async fn add(
    State(state): State<Arc<AppState>>,
    Json(favorite): Json<Favorite>,
) -> AppResult<Json<Value>> {
    if favorite.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title required".to_string()));
    }

    let created = favorites::add(&state.db_pool, &favorite).await?;
    tracing::info!(id = favorite.id, created = created, "Favorite saved");

    Ok(Json(json!({ "success": true, "created": created })))
}

pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Favorite>>> {
    Ok(Json(favorites::list(&state.db_pool).await?))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let removed = favorites::remove(&state.db_pool, id).await?;
    tracing::info!(id = id, removed = removed, "Favorite removed");

    Ok(Json(json!({ "success": true, "removed": removed })))
}

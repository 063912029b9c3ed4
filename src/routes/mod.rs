use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{providers::CatalogProvider, recommendations::RecommendOptions},
};

pub mod favorites;
pub mod recommendations;
pub mod search;
pub mod titles;

/// Shared state handed to every handler
pub struct AppState {
    pub db_pool: SqlitePool,
    pub catalog: Arc<dyn CatalogProvider>,
    pub recommend_options: RecommendOptions,
    /// Country used for streaming provider lookups
    pub watch_region: String,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
        .route("/moods", get(recommendations::moods))
        .route("/recommend", post(recommendations::recommend))
        .route("/search", post(search::search))
        .route("/trending", get(titles::trending))
        .route("/top-rated", get(titles::top_rated))
        .route("/movie/:id", get(titles::movie))
        .route("/details/:media_type/:id", get(titles::details))
        .route("/favorite", post(favorites::add))
        .route("/favorite/:id", delete(favorites::remove))
        .route("/favorites", get(favorites::list))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

async fn banner() -> &'static str {
    "MoodFlix backend running"
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use moodflix_api::{
    config::{CacheBackend, Config},
    db::{self, Cache},
    routes::{create_router, AppState},
    services::{CatalogProvider, TmdbProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodflix_api=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let db_pool = db::create_pool(&config.database_url)
        .await
        .context("failed to open favorites database")?;
    db::run_migrations(&db_pool)
        .await
        .context("failed to run migrations")?;
    tracing::info!(database_url = %config.database_url, "Favorites database ready");

    let (cache, cache_writer) = match config.cache_backend {
        CacheBackend::Memory => (Cache::memory(), None),
        CacheBackend::Redis => {
            let client = db::create_redis_client(&config.redis_url)?;
            let (cache, handle) = Cache::redis(client);
            (cache, Some(handle))
        }
    };
    tracing::info!(
        backend = ?config.cache_backend,
        ttl_secs = config.cache_ttl_secs,
        "Cache ready"
    );

    let catalog: Arc<dyn CatalogProvider> = Arc::new(TmdbProvider::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.cache_ttl_secs,
    )?);

    let state = Arc::new(AppState {
        db_pool,
        catalog: catalog.clone(),
        recommend_options: config.recommend_options(),
        watch_region: config.watch_region.clone(),
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        catalog = catalog.name(),
        "MoodFlix backend running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

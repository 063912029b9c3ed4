use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{MediaType, MoviePage, MovieSummary, WatchProvider},
    services::providers::CatalogProvider,
};

/// Catalog details with the trailer already picked out
#[derive(Debug, Clone, Serialize)]
pub struct DetailsResponse {
    #[serde(flatten)]
    pub details: Map<String, Value>,
    pub trailer_key: Option<String>,
    #[serde(rename = "watchProviders", skip_serializing_if = "Option::is_none")]
    pub watch_providers: Option<Vec<WatchProvider>>,
    pub fetched_at: DateTime<Utc>,
}

/// Details for one title, without provider lookup
pub async fn details(
    provider: Arc<dyn CatalogProvider>,
    media_type: MediaType,
    id: u64,
) -> AppResult<DetailsResponse> {
    let details = provider.details(media_type, id).await?;
    let trailer_key = details.trailer_key();

    Ok(DetailsResponse {
        trailer_key,
        details: details.body,
        watch_providers: None,
        fetched_at: details.fetched_at,
    })
}

/// Details plus the flat-rate streaming providers in `region`.
///
/// Both catalog calls run concurrently.
pub async fn details_with_providers(
    provider: Arc<dyn CatalogProvider>,
    media_type: MediaType,
    id: u64,
    region: &str,
) -> AppResult<DetailsResponse> {
    let (details, providers) = tokio::join!(
        provider.details(media_type, id),
        provider.watch_providers(media_type, id, region)
    );
    let details = details?;
    let providers = providers?;

    tracing::debug!(id = id, region = %region, providers = providers.len(), "Details with providers");

    Ok(DetailsResponse {
        trailer_key: details.trailer_key(),
        details: details.body,
        watch_providers: Some(providers),
        fetched_at: details.fetched_at,
    })
}

/// Drops poster-less rows so the grid never shows blank cards
fn displayable(mut page: MoviePage) -> MoviePage {
    page.results.retain(MovieSummary::has_poster);
    page
}

pub async fn trending(
    provider: Arc<dyn CatalogProvider>,
    media_type: MediaType,
    page: u32,
) -> AppResult<MoviePage> {
    Ok(displayable(provider.trending(media_type, page).await?))
}

pub async fn top_rated(
    provider: Arc<dyn CatalogProvider>,
    media_type: MediaType,
    page: u32,
) -> AppResult<MoviePage> {
    Ok(displayable(provider.top_rated(media_type, page).await?))
}

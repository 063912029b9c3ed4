use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{DiscoverQuery, MediaType, MovieSummary},
    services::{
        mood, providers::CatalogProvider, ranking, recommendations::fetch_pages,
        recommendations::RecommendOptions,
    },
};

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    /// Original-language codes to keep, e.g. `["en", "hi"]`; empty keeps all
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(rename = "type", default)]
    pub media_type: MediaType,
}

/// Which step of the fallback chain produced the results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    Search,
    Mood,
    Trending,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub source: SearchSource,
    pub total: usize,
    pub results: BTreeMap<String, Vec<MovieSummary>>,
}

/// Searches the catalog, falling back to the query's mood and then to trending.
///
/// A failed step counts as empty; only a trending failure fails the request.
///
/// Results are ranked, narrowed to the requested languages and grouped by language.
pub async fn search(
    provider: Arc<dyn CatalogProvider>,
    options: &RecommendOptions,
    request: SearchRequest,
) -> AppResult<SearchResponse> {
    let query = request.query.trim().to_string();
    if query.is_empty() {
        return Err(AppError::InvalidInput("Query required".to_string()));
    }

    let languages: Vec<String> = request
        .languages
        .iter()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect();

    let mut source = SearchSource::Search;
    let mut movies = match provider.search(request.media_type, &query, 1).await {
        Ok(found) => narrow(found.results, &languages, options.score_k),
        Err(e) => {
            tracing::warn!(query = %query, error = %e, "Catalog search failed, continuing fallback");
            Vec::new()
        }
    };

    if movies.is_empty() {
        if let Some(detected) = mood::detect(&query) {
            tracing::info!(query = %query, mood = detected.name, "Search empty, falling back to mood");
            source = SearchSource::Mood;
            let queries = mood_queries(detected.genres, &languages, request.media_type, options);
            match fetch_pages(provider.clone(), queries).await {
                Ok(pages) => {
                    movies = narrow(
                        pages.into_iter().flat_map(|p| p.results).collect(),
                        &languages,
                        options.score_k,
                    );
                }
                Err(e) => {
                    tracing::warn!(query = %query, error = %e, "Mood discover failed, continuing fallback");
                }
            }
        }
    }

    if movies.is_empty() {
        tracing::info!(query = %query, "Falling back to trending");
        source = SearchSource::Trending;
        let trending = provider.trending(request.media_type, 1).await?;
        movies = narrow(trending.results, &languages, options.score_k);
    }

    tracing::info!(
        query = %query,
        source = ?source,
        results = movies.len(),
        "Search completed"
    );

    Ok(SearchResponse {
        query,
        source,
        total: movies.len(),
        results: ranking::partition_by_language(movies),
    })
}

/// One discover query per language, or a single unrestricted one
fn mood_queries(
    genres: &[u32],
    languages: &[String],
    media_type: MediaType,
    options: &RecommendOptions,
) -> Vec<DiscoverQuery> {
    let query = |language: Option<String>| DiscoverQuery {
        media_type,
        genres: genres.to_vec(),
        language,
        sort_by: "popularity.desc".to_string(),
        page: 1,
        min_vote_count: options.min_vote_count,
    };

    if languages.is_empty() {
        vec![query(None)]
    } else {
        languages.iter().map(|l| query(Some(l.clone()))).collect()
    }
}

fn narrow(movies: Vec<MovieSummary>, languages: &[String], k: f64) -> Vec<MovieSummary> {
    ranking::rank(ranking::filter_languages(movies, languages), k)
}

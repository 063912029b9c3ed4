use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{DiscoverQuery, MediaType, MoviePage, MovieSummary, MAX_UPSTREAM_PAGE},
    services::{mood, providers::CatalogProvider, ranking},
};

const STABLE_SORT: &str = "popularity.desc";

/// Tuning for mood recommendations
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendOptions {
    /// Upstream pages fetched concurrently for one logical page
    pub fanout: u32,
    /// Random logical page is drawn from `1..=random_page_max`
    pub random_page_max: u32,
    pub min_vote_count: u32,
    pub score_k: f64,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            fanout: 3,
            random_page_max: 20,
            min_vote_count: 100,
            score_k: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(rename = "type", default)]
    pub media_type: MediaType,
    /// Logical page; when absent a random page and sort order are used
    #[serde(default)]
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendResponse {
    /// Name of the detected mood, `None` when the drama fallback applied
    pub mood: Option<&'static str>,
    pub genres: Vec<u32>,
    pub page: u32,
    pub total_pages: u32,
    pub movies: Vec<MovieSummary>,
}

/// Upstream page numbers covered by logical page `page`
pub fn upstream_pages(page: u32, fanout: u32) -> Vec<u32> {
    let first = page.saturating_sub(1).saturating_mul(fanout).saturating_add(1);
    (first..first.saturating_add(fanout))
        .filter(|p| *p <= MAX_UPSTREAM_PAGE)
        .collect()
}

/// Logical page count for `upstream_total` upstream pages
pub fn logical_total_pages(upstream_total: u32, fanout: u32) -> u32 {
    upstream_total.min(MAX_UPSTREAM_PAGE).div_ceil(fanout.max(1))
}

/// Picks page and sort order. Random choices only happen when the client sent no page.
fn choose_page_and_sort(
    requested: Option<u32>,
    media_type: MediaType,
    options: &RecommendOptions,
) -> (u32, String) {
    match requested {
        Some(page) => (page.max(1), STABLE_SORT.to_string()),
        None => {
            let mut rng = rand::thread_rng();
            let page = rng.gen_range(1..=options.random_page_max.max(1));
            let sort = media_type
                .sort_options()
                .choose(&mut rng)
                .copied()
                .unwrap_or(STABLE_SORT);
            (page, sort.to_string())
        }
    }
}

/// Runs discover queries concurrently and returns their pages in input order.
///
/// Individual failures are logged and skipped; the call only fails when every
/// query failed.
pub async fn fetch_pages(
    provider: Arc<dyn CatalogProvider>,
    queries: Vec<DiscoverQuery>,
) -> AppResult<Vec<MoviePage>> {
    let mut tasks = Vec::new();

    for query in queries {
        let provider = provider.clone();
        let task = tokio::spawn(async move { provider.discover(&query).await });
        tasks.push(task);
    }

    let mut results = Vec::new();
    let mut errors = Vec::new();

    for task in tasks {
        match task.await {
            Ok(Ok(page)) => results.push(page),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Discover page fetch failed");
                errors.push(e);
            }
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                errors.push(AppError::Internal(e.to_string()));
            }
        }
    }

    if !errors.is_empty() {
        tracing::warn!(
            success_count = results.len(),
            error_count = errors.len(),
            "Partial discover fetch failure"
        );
    }

    if results.is_empty() {
        if let Some(first) = errors.into_iter().next() {
            return Err(first);
        }
    }

    Ok(results)
}

/// Recommends titles for a free-text mood
pub async fn recommend(
    provider: Arc<dyn CatalogProvider>,
    options: &RecommendOptions,
    request: RecommendRequest,
) -> AppResult<RecommendResponse> {
    if request.mood.trim().is_empty() {
        return Err(AppError::InvalidInput("Mood required".to_string()));
    }

    let detected = mood::detect(&request.mood);
    let genres = mood::genres_for(&request.mood).to_vec();
    let (page, sort_by) = choose_page_and_sort(request.page, request.media_type, options);
    let fanout = options.fanout.max(1);

    tracing::info!(
        mood = %request.mood,
        detected = ?detected.map(|m| m.name),
        genres = ?genres,
        page = page,
        sort_by = %sort_by,
        "Processing recommendation request"
    );

    let queries: Vec<DiscoverQuery> = upstream_pages(page, fanout)
        .into_iter()
        .map(|upstream_page| DiscoverQuery {
            media_type: request.media_type,
            genres: genres.clone(),
            language: request.language.clone().filter(|l| !l.trim().is_empty()),
            sort_by: sort_by.clone(),
            page: upstream_page,
            min_vote_count: options.min_vote_count,
        })
        .collect();

    // Pages past the upstream limit fetch nothing and report the limit itself
    let (pages, upstream_total) = if queries.is_empty() {
        (Vec::new(), MAX_UPSTREAM_PAGE)
    } else {
        let pages = fetch_pages(provider, queries).await?;
        let total = pages.iter().map(|p| p.total_pages).max().unwrap_or(0);
        (pages, total)
    };
    let movies = ranking::rank(
        pages.into_iter().flat_map(|p| p.results).collect(),
        options.score_k,
    );

    tracing::info!(
        movies = movies.len(),
        upstream_total_pages = upstream_total,
        "Recommendation completed"
    );

    Ok(RecommendResponse {
        mood: detected.map(|m| m.name),
        genres,
        page,
        total_pages: logical_total_pages(upstream_total, fanout),
        movies,
    })
}

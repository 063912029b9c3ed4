//! Movie catalog abstraction
//!
//! Route handlers and services only see this trait, so the TMDB client can be
//! swapped for a stub in tests or another catalog later.

use crate::{
    error::AppResult,
    models::{DiscoverQuery, MediaType, MoviePage, TitleDetails, WatchProvider},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Browse titles by genre, language and sort order
    async fn discover(&self, query: &DiscoverQuery) -> AppResult<MoviePage>;

    /// Free-text title search
    async fn search(&self, media_type: MediaType, query: &str, page: u32) -> AppResult<MoviePage>;

    /// Titles trending this week
    async fn trending(&self, media_type: MediaType, page: u32) -> AppResult<MoviePage>;

    /// Highest rated titles of all time
    async fn top_rated(&self, media_type: MediaType, page: u32) -> AppResult<MoviePage>;

    /// Full details for one title, including its videos
    ///
    /// Returns `AppError::NotFound` when the catalog has no such id.
    async fn details(&self, media_type: MediaType, id: u64) -> AppResult<TitleDetails>;

    /// Flat-rate streaming providers for one title in `region`
    async fn watch_providers(
        &self,
        media_type: MediaType,
        id: u64,
        region: &str,
    ) -> AppResult<Vec<WatchProvider>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

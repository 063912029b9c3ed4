pub mod mood;
pub mod providers;
pub mod ranking;
pub mod recommendations;
pub mod search;
pub mod titles;

pub use providers::{CatalogProvider, TmdbProvider};

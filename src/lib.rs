//! Mood-based movie discovery backend.
//!
//! Maps free-text moods to TMDB genres, fans out catalog queries, ranks the
//! results and keeps a small favorites table in SQLite.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;

pub mod favorite;

pub use favorite::Favorite;

/// TMDB refuses page numbers above this.
pub const MAX_UPSTREAM_PAGE: u32 = 500;

/// Kind of catalog entry. TMDB keeps movies and TV shows under separate paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
    Tv,
}

impl MediaType {
    /// Sort orders the discover endpoint accepts for this media type
    pub fn sort_options(&self) -> &'static [&'static str] {
        match self {
            MediaType::Movie => &[
                "popularity.desc",
                "vote_average.desc",
                "vote_count.desc",
                "release_date.desc",
            ],
            MediaType::Tv => &[
                "popularity.desc",
                "vote_average.desc",
                "vote_count.desc",
                "first_air_date.desc",
            ],
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Tv => write!(f, "tv"),
        }
    }
}

/// A single result row from any TMDB list endpoint (discover, search, trending, top rated).
///
/// TV rows carry `name` / `first_air_date` instead of `title` / `release_date`; both
/// shapes land in the same fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default, alias = "first_air_date")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl MovieSummary {
    pub fn has_poster(&self) -> bool {
        self.poster_path
            .as_deref()
            .is_some_and(|path| !path.trim().is_empty())
    }
}

/// One page of a TMDB list response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MoviePage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

/// Parameters for `/discover/{movie|tv}`
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    pub media_type: MediaType,
    pub genres: Vec<u32>,
    pub language: Option<String>,
    pub sort_by: String,
    pub page: u32,
    pub min_vote_count: u32,
}

impl DiscoverQuery {
    /// Query-string parameters, minus the API key
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("with_genres", self.genre_list()),
            ("sort_by", self.sort_by.clone()),
            ("page", self.page.to_string()),
            ("vote_count.gte", self.min_vote_count.to_string()),
        ];
        if let Some(language) = self.language.as_deref().filter(|l| !l.is_empty()) {
            params.push(("with_original_language", language.to_string()));
        }
        params
    }

    /// Stable string identifying this query in the cache
    pub fn cache_fragment(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}:{}",
            self.media_type,
            self.genre_list(),
            self.language.as_deref().unwrap_or("*"),
            self.sort_by,
            self.page,
            self.min_vote_count
        )
    }

    fn genre_list(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Entry of `/{type}/{id}/watch/providers`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchProvider {
    pub provider_id: u64,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub display_priority: Option<u32>,
}

/// Full title details as returned by the catalog, kept as a raw JSON object so
/// that every upstream field reaches the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleDetails {
    pub body: Map<String, Value>,
    pub fetched_at: DateTime<Utc>,
}

impl TitleDetails {
    pub fn new(body: Map<String, Value>) -> Self {
        Self {
            body,
            fetched_at: Utc::now(),
        }
    }

    /// Key of the first YouTube trailer in the appended `videos` block
    pub fn trailer_key(&self) -> Option<String> {
        let videos: VideoList = self
            .body
            .get("videos")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())?;

        videos
            .results
            .into_iter()
            .find(|video| video.video_type == "Trailer" && video.site == "YouTube")
            .map(|video| video.key)
    }
}

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    results: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    key: String,
    #[serde(default)]
    site: String,
    #[serde(rename = "type", default)]
    video_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn details(body: Value) -> TitleDetails {
        match body {
            Value::Object(map) => TitleDetails::new(map),
            _ => panic!("details body must be an object"),
        }
    }

    #[test]
    fn test_media_type_display() {
        assert_eq!(MediaType::Movie.to_string(), "movie");
        assert_eq!(MediaType::Tv.to_string(), "tv");
    }

    #[test]
    fn test_media_type_deserializes_lowercase() {
        let media: MediaType = serde_json::from_str("\"tv\"").unwrap();
        assert_eq!(media, MediaType::Tv);
        assert!(serde_json::from_str::<MediaType>("\"anime\"").is_err());
    }

    #[test]
    fn test_tv_sort_options_use_air_date() {
        assert!(MediaType::Tv.sort_options().contains(&"first_air_date.desc"));
        assert!(!MediaType::Tv.sort_options().contains(&"release_date.desc"));
    }

    #[test]
    fn test_movie_summary_from_tv_row() {
        let row = json!({
            "id": 1396,
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "poster_path": "/ggFHVNu6YYI5L9pCfOacjizRGt.jpg",
            "vote_average": 8.9,
            "vote_count": 14000,
            "original_language": "en",
            "genre_ids": [18, 80]
        });

        let summary: MovieSummary = serde_json::from_value(row).unwrap();
        assert_eq!(summary.title, "Breaking Bad");
        assert_eq!(summary.release_date.as_deref(), Some("2008-01-20"));
        assert_eq!(summary.genre_ids, vec![18, 80]);
        assert!(summary.has_poster());
    }

    #[test]
    fn test_movie_summary_tolerates_sparse_rows() {
        let summary: MovieSummary =
            serde_json::from_value(json!({ "id": 7, "poster_path": null })).unwrap();
        assert_eq!(summary.title, "");
        assert_eq!(summary.vote_count, 0);
        assert!(!summary.has_poster());
    }

    #[test]
    fn test_discover_params_skip_empty_language() {
        let query = DiscoverQuery {
            media_type: MediaType::Movie,
            genres: vec![35, 10751, 12],
            language: Some(String::new()),
            sort_by: "popularity.desc".to_string(),
            page: 4,
            min_vote_count: 100,
        };

        let params = query.params();
        assert!(params.contains(&("with_genres", "35,10751,12".to_string())));
        assert!(params.contains(&("page", "4".to_string())));
        assert!(params.contains(&("vote_count.gte", "100".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "with_original_language"));
    }

    #[test]
    fn test_discover_cache_fragment_distinguishes_language() {
        let mut query = DiscoverQuery {
            media_type: MediaType::Movie,
            genres: vec![27],
            language: None,
            sort_by: "popularity.desc".to_string(),
            page: 1,
            min_vote_count: 100,
        };
        let any_language = query.cache_fragment();
        query.language = Some("hi".to_string());

        assert_eq!(any_language, "movie:27:*:popularity.desc:1:100");
        assert_eq!(query.cache_fragment(), "movie:27:hi:popularity.desc:1:100");
    }

    #[test]
    fn test_trailer_key_picks_first_youtube_trailer() {
        let details = details(json!({
            "id": 27205,
            "title": "Inception",
            "videos": { "results": [
                { "key": "teaser1", "site": "YouTube", "type": "Teaser" },
                { "key": "vimeo1", "site": "Vimeo", "type": "Trailer" },
                { "key": "YoHD9XEInc0", "site": "YouTube", "type": "Trailer" },
                { "key": "later", "site": "YouTube", "type": "Trailer" }
            ]}
        }));

        assert_eq!(details.trailer_key(), Some("YoHD9XEInc0".to_string()));
    }

    #[test]
    fn test_trailer_key_missing_videos() {
        let details = details(json!({ "id": 1, "title": "No Videos" }));
        assert_eq!(details.trailer_key(), None);
    }
}

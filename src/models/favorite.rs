use serde::{Deserialize, Serialize};

/// A movie the user saved, keyed by the catalog's own id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Favorite {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(rename = "type", default)]
    #[sqlx(rename = "type")]
    pub media_type: Option<String>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One hit from a title search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchResponse {
    Found(Vec<SearchResultItem>),
    /// The remote reported no match. `reason` is informational only.
    NotFound { reason: Option<String> },
}

/// Full record for a single movie. Every field is optional on the wire and
/// defaults to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieDetail {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Released")]
    pub released: String,
    #[serde(rename = "Runtime")]
    pub runtime: String,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    #[serde(rename = "Plot")]
    pub plot: String,
    #[serde(rename = "Actors")]
    pub actors: String,
    #[serde(rename = "Director")]
    pub director: String,
    #[serde(rename = "Poster")]
    pub poster: String,
}

impl MovieDetail {
    /// Leading numeric token of the free-text runtime, e.g. "148 min" -> 148.
    pub fn runtime_minutes(&self) -> Option<u32> {
        self.runtime.split_whitespace().next()?.parse().ok()
    }

    pub fn imdb_rating_value(&self) -> Option<f64> {
        self.imdb_rating.trim().parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedEntry {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
    pub imdb_rating: f64,
    pub runtime: u32,
    pub user_rating: u8,
    pub added_at: DateTime<Utc>,
}

impl WatchedEntry {
    /// Unparsable runtime or rating values are recorded as zero.
    pub fn from_detail(imdb_id: &str, detail: &MovieDetail, user_rating: u8) -> Self {
        let runtime = detail.runtime_minutes().unwrap_or_else(|| {
            warn!("Unparsable runtime {:?} for {}, recording 0", detail.runtime, imdb_id);
            0
        });
        let imdb_rating = detail.imdb_rating_value().unwrap_or_else(|| {
            warn!("Unparsable IMDB rating {:?} for {}, recording 0", detail.imdb_rating, imdb_id);
            0.0
        });

        Self {
            imdb_id: imdb_id.to_string(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster: detail.poster.clone(),
            imdb_rating,
            runtime,
            user_rating,
            added_at: Utc::now(),
        }
    }
}

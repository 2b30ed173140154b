use crate::models::{MovieDetail, SearchResponse};
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// Message shown when a search yields nothing usable.
pub const NOT_FOUND_MESSAGE: &str = "Movie not found.";

#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Transport(reqwest::Error),
    #[error("request failed with status {0}")]
    Status(StatusCode),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("lookup cancelled")]
    Cancelled,
}

/// Request URLs carry the api key, so they are stripped before the error
/// can reach a log line or the view.
impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        LookupError::Transport(e.without_url())
    }
}

impl LookupError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LookupError::Cancelled)
    }

    /// The text to show inline for a failed search. A bad status carries no
    /// message of its own, so it falls back to the not-found text.
    pub fn user_message(&self) -> String {
        let message = match self {
            LookupError::Status(_) | LookupError::Cancelled => None,
            other => Some(other.to_string()),
        };

        message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string())
    }
}

/// Remote movie database as seen by the controllers.
#[async_trait]
pub trait MovieSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResponse, LookupError>;
    async fn details(&self, id: &str) -> Result<MovieDetail, LookupError>;
}

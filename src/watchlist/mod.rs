//! Selected movie, pending rating and the watched collection.

use crate::models::{MovieDetail, WatchedEntry};
use crate::source::{LookupError, MovieSource};
use tracing::{debug, info, warn};

pub const MAX_RATING: u8 = 10;
pub const DEFAULT_TITLE: &str = "Movie Bazar";

#[derive(Debug, Clone, PartialEq)]
pub struct DetailTicket {
    pub id: String,
}

#[derive(Debug)]
pub struct DetailOutcome {
    pub id: String,
    pub result: Result<MovieDetail, LookupError>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub avg_imdb_rating: f64,
    pub avg_user_rating: f64,
    pub avg_runtime: f64,
}

#[derive(Debug, Default)]
pub struct WatchlistController {
    selected: Option<String>,
    detail: Option<MovieDetail>,
    loading: bool,
    detail_error: Option<String>,
    pending_rating: u8,
    watched: Vec<WatchedEntry>,
}

impl WatchlistController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn detail(&self) -> Option<&MovieDetail> {
        self.detail.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn detail_error(&self) -> Option<&str> {
        self.detail_error.as_deref()
    }

    pub fn pending_rating(&self) -> u8 {
        self.pending_rating
    }

    pub fn watched(&self) -> &[WatchedEntry] {
        &self.watched
    }

    /// Selecting the already selected movie deselects it. A ticket is
    /// returned whenever a new movie becomes selected.
    pub fn select(&mut self, id: Option<&str>) -> Option<DetailTicket> {
        let next = match id {
            Some(id) if self.selected.as_deref() == Some(id) => None,
            other => other.map(str::to_string),
        };

        self.pending_rating = 0;
        self.detail = None;
        self.detail_error = None;

        match next {
            Some(id) => {
                info!("Selected {}", id);
                self.selected = Some(id.clone());
                self.loading = true;
                Some(DetailTicket { id })
            }
            None => {
                if let Some(previous) = self.selected.take() {
                    debug!("Deselected {}", previous);
                }
                self.loading = false;
                None
            }
        }
    }

    /// Applies a detail lookup. Responses are not matched against the current
    /// selection, so a late response for an earlier pick still lands.
    pub fn apply_detail(&mut self, outcome: DetailOutcome) {
        if self.selected.is_none() {
            debug!("Dropping details for {}: nothing selected", outcome.id);
            return;
        }

        match outcome.result {
            Ok(detail) => {
                self.detail = Some(detail);
                self.detail_error = None;
            }
            Err(e) => {
                warn!("Failed to load details for {}: {}", outcome.id, e);
                self.detail_error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    /// Records a rating for the displayed movie. Nothing is recorded until
    /// its detail has loaded, and values above the scale are rejected.
    pub fn rate(&mut self, value: u8) -> bool {
        if self.selected.is_none() || self.detail.is_none() {
            return false;
        }
        if value > MAX_RATING {
            warn!("Ignoring rating {} above {}", value, MAX_RATING);
            return false;
        }
        self.pending_rating = value;
        true
    }

    /// Moves the displayed movie into the watched collection and returns to
    /// the list view. Does nothing without a loaded detail and a positive
    /// rating. The collection is not de-duplicated here.
    pub fn commit(&mut self) -> Option<&WatchedEntry> {
        if self.pending_rating == 0 {
            return None;
        }
        let (Some(id), Some(detail)) = (self.selected.as_deref(), self.detail.as_ref()) else {
            return None;
        };

        let entry = WatchedEntry::from_detail(id, detail, self.pending_rating);
        info!("Added {} to watched with rating {}", entry.title, entry.user_rating);
        self.watched.push(entry);
        self.select(None);
        self.watched.last()
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.watched.len();
        self.watched.retain(|entry| entry.imdb_id != id);
        let removed = self.watched.len() != before;
        if removed {
            info!("Removed {} from watched", id);
        }
        removed
    }

    /// User rating already recorded for the selected movie, if any.
    pub fn already_rated(&self) -> Option<u8> {
        let id = self.selected.as_deref()?;
        self.watched
            .iter()
            .find(|entry| entry.imdb_id == id)
            .map(|entry| entry.user_rating)
    }

    pub fn page_title(&self) -> String {
        match &self.detail {
            Some(detail) if !detail.title.is_empty() => format!("Movie | {}", detail.title),
            _ => DEFAULT_TITLE.to_string(),
        }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            count: self.watched.len(),
            avg_imdb_rating: average(self.watched.iter().map(|e| e.imdb_rating)),
            avg_user_rating: average(self.watched.iter().map(|e| f64::from(e.user_rating))),
            avg_runtime: average(self.watched.iter().map(|e| f64::from(e.runtime))),
        }
    }
}

/// Mean of `values`, 0 when empty.
fn average<I>(values: I) -> f64
where
    I: ExactSizeIterator<Item = f64>,
{
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    values.fold(0.0, |acc, v| acc + v / len as f64)
}

pub async fn run<S: MovieSource + ?Sized>(source: &S, ticket: DetailTicket) -> DetailOutcome {
    let result = source.details(&ticket.id).await;
    DetailOutcome {
        id: ticket.id,
        result,
    }
}

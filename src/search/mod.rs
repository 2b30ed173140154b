//! Query-driven search state.
//!
//! Every query transition cancels the previously issued lookup. A lookup is
//! only ever applied if its token is still live, so results land in issuance
//! order no matter when responses arrive.

use crate::models::{SearchResponse, SearchResultItem};
use crate::source::{LookupError, MovieSource, NOT_FOUND_MESSAGE};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const MIN_QUERY_LEN: usize = 3;

/// A lookup the caller has to run, see [`run`].
#[derive(Debug, Clone)]
pub struct SearchTicket {
    pub query: String,
    pub token: CancellationToken,
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub token: CancellationToken,
    pub result: Result<SearchResponse, LookupError>,
}

#[derive(Debug, Default)]
pub struct SearchController {
    query: String,
    movies: Vec<SearchResultItem>,
    loading: bool,
    error: Option<String>,
    in_flight: Option<CancellationToken>,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn movies(&self) -> &[SearchResultItem] {
        &self.movies
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns a ticket when a lookup must be issued. Re-entering the same
    /// query issues a fresh lookup.
    pub fn set_query(&mut self, query: impl Into<String>) -> Option<SearchTicket> {
        self.query = query.into();

        if let Some(previous) = self.in_flight.take() {
            debug!("Cancelling previous search");
            previous.cancel();
        }

        if self.query.chars().count() < MIN_QUERY_LEN {
            self.movies.clear();
            self.error = None;
            self.loading = false;
            return None;
        }

        info!("Searching for {:?}", self.query);
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        self.loading = true;
        self.error = None;

        Some(SearchTicket {
            query: self.query.clone(),
            token,
        })
    }

    pub fn apply(&mut self, outcome: SearchOutcome) {
        if outcome.token.is_cancelled() {
            debug!("Dropping result of a superseded search");
            return;
        }

        match outcome.result {
            Ok(SearchResponse::Found(items)) => {
                info!("Showing {} results", items.len());
                self.movies = items;
                self.error = None;
            }
            Ok(SearchResponse::NotFound { reason }) => {
                debug!("No match: {:?}", reason);
                self.movies.clear();
                self.error = Some(NOT_FOUND_MESSAGE.to_string());
            }
            Err(e) if e.is_cancelled() => return,
            Err(e) => {
                warn!("Search failed: {}", e);
                self.error = Some(e.user_message());
            }
        }

        self.loading = false;
        self.in_flight = None;
    }
}

/// Runs the lookup described by `ticket`, giving up as soon as its token is
/// cancelled.
pub async fn run<S: MovieSource + ?Sized>(source: &S, ticket: SearchTicket) -> SearchOutcome {
    let result = tokio::select! {
        _ = ticket.token.cancelled() => Err(LookupError::Cancelled),
        result = source.search(&ticket.query) => result,
    };

    SearchOutcome {
        token: ticket.token,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fake::FakeSource;
    use reqwest::StatusCode;
    use std::time::Duration;

    fn item(id: &str, title: &str) -> SearchResultItem {
        SearchResultItem {
            imdb_id: id.to_string(),
            title: title.to_string(),
            year: "2010".to_string(),
            poster: String::new(),
        }
    }

    fn found(ticket: &SearchTicket, items: Vec<SearchResultItem>) -> SearchOutcome {
        SearchOutcome {
            token: ticket.token.clone(),
            result: Ok(SearchResponse::Found(items)),
        }
    }

    #[test]
    fn short_queries_are_gated() {
        let mut search = SearchController::new();
        let ticket = search.set_query("Inception").unwrap();
        search.apply(found(&ticket, vec![item("tt1375666", "Inception")]));

        for query in ["", "I", "In"] {
            assert!(search.set_query(query).is_none());
            assert!(search.movies().is_empty());
            assert!(search.error().is_none());
            assert!(!search.is_loading());
        }
    }

    #[test]
    fn gate_counts_characters_not_bytes() {
        let mut search = SearchController::new();
        assert!(search.set_query("éé").is_none());
        assert!(search.set_query("ééé").is_some());
    }

    #[test]
    fn issuing_marks_loading_and_clears_error() {
        let mut search = SearchController::new();
        let ticket = search.set_query("zzzz").unwrap();
        search.apply(SearchOutcome {
            token: ticket.token,
            result: Ok(SearchResponse::NotFound { reason: None }),
        });
        assert_eq!(search.error(), Some(NOT_FOUND_MESSAGE));

        search.set_query("Inception").unwrap();
        assert!(search.is_loading());
        assert!(search.error().is_none());
    }

    #[test]
    fn newer_query_wins_even_if_older_resolves_last() {
        let mut search = SearchController::new();
        let a = search.set_query("Alien").unwrap();
        let b = search.set_query("Blade Runner").unwrap();

        assert!(a.token.is_cancelled());
        assert!(!b.token.is_cancelled());

        search.apply(found(&b, vec![item("tt0083658", "Blade Runner")]));
        search.apply(found(&a, vec![item("tt0078748", "Alien")]));

        assert_eq!(search.movies().len(), 1);
        assert_eq!(search.movies()[0].title, "Blade Runner");
        assert!(!search.is_loading());
    }

    #[test]
    fn cancelled_outcome_leaves_loading_alone() {
        let mut search = SearchController::new();
        let a = search.set_query("Alien").unwrap();
        let _b = search.set_query("Blade Runner").unwrap();

        search.apply(SearchOutcome {
            token: a.token.clone(),
            result: Err(LookupError::Status(StatusCode::INTERNAL_SERVER_ERROR)),
        });
        search.apply(SearchOutcome {
            token: a.token,
            result: Err(LookupError::Cancelled),
        });

        assert!(search.is_loading());
        assert!(search.error().is_none());
    }

    #[test]
    fn no_match_ignores_remote_error_text() {
        let mut search = SearchController::new();
        for reason in [None, Some("Too many results.".to_string())] {
            let ticket = search.set_query("Inception").unwrap();
            search.apply(found(&ticket, vec![item("tt1375666", "Inception")]));

            let ticket = search.set_query("qwertyuiop").unwrap();
            search.apply(SearchOutcome {
                token: ticket.token,
                result: Ok(SearchResponse::NotFound { reason }),
            });

            assert_eq!(search.error(), Some(NOT_FOUND_MESSAGE));
            assert!(search.movies().is_empty());
            assert!(!search.is_loading());
        }
    }

    #[test]
    fn failure_without_message_falls_back() {
        let mut search = SearchController::new();
        let ticket = search.set_query("Inception").unwrap();
        search.apply(SearchOutcome {
            token: ticket.token,
            result: Err(LookupError::Status(StatusCode::BAD_GATEWAY)),
        });

        assert_eq!(search.error(), Some(NOT_FOUND_MESSAGE));
        assert!(!search.is_loading());
    }

    #[test]
    fn failure_message_is_surfaced() {
        let mut search = SearchController::new();
        let ticket = search.set_query("Inception").unwrap();
        let decode = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        search.apply(SearchOutcome {
            token: ticket.token,
            result: Err(decode.into()),
        });

        let error = search.error().unwrap();
        assert!(error.starts_with("malformed response"));
    }

    #[tokio::test]
    async fn run_resolves_live_ticket() {
        let source = FakeSource::new().with_results("Inception", vec![item("tt1375666", "Inception")]);
        let mut search = SearchController::new();
        let ticket = search.set_query("Inception").unwrap();

        let outcome = run(&source, ticket).await;
        search.apply(outcome);

        assert_eq!(search.movies()[0].imdb_id, "tt1375666");
        assert_eq!(source.searches(), vec!["Inception".to_string()]);
    }

    #[tokio::test]
    async fn run_stops_on_cancellation() {
        let source = FakeSource::new().hanging("Alien");
        let mut search = SearchController::new();
        let ticket = search.set_query("Alien").unwrap();

        let pending = tokio::spawn({
            let ticket = ticket.clone();
            async move { run(&source, ticket).await }
        });
        search.set_query("Blade Runner");

        let outcome = pending.await.unwrap();
        assert!(matches!(outcome.result, Err(LookupError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_lookup_never_times_out() {
        let source = FakeSource::new().hanging("Alien");
        let mut search = SearchController::new();
        let ticket = search.set_query("Alien").unwrap();

        let lookup = run(&source, ticket);
        let waited = tokio::time::timeout(Duration::from_secs(24 * 60 * 60), lookup).await;

        assert!(waited.is_err());
        assert!(search.is_loading());
    }
}

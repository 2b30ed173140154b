use crate::search::{self, SearchController, SearchOutcome, SearchTicket};
use crate::source::MovieSource;
use crate::watchlist::{self, DetailOutcome, DetailTicket, WatchlistController};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// What the user asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SetQuery(String),
    Select(Option<String>),
    Rate(u8),
    Commit,
    Remove(String),
}

/// A finished lookup coming back from a spawned task.
#[derive(Debug)]
pub enum Event {
    Search(SearchOutcome),
    Detail(DetailOutcome),
}

/// Owns both controllers and is the only writer of their state. Lookups run
/// on spawned tasks and report back through the event channel.
pub struct App<S: MovieSource + 'static> {
    source: Arc<S>,
    search: SearchController,
    watchlist: WatchlistController,
    events: UnboundedSender<Event>,
}

impl<S: MovieSource + 'static> App<S> {
    pub fn new(source: Arc<S>) -> (Self, UnboundedReceiver<Event>) {
        let (events, rx) = mpsc::unbounded_channel();
        let app = Self {
            source,
            search: SearchController::new(),
            watchlist: WatchlistController::new(),
            events,
        };
        (app, rx)
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn watchlist(&self) -> &WatchlistController {
        &self.watchlist
    }

    /// Returns whether the intent changed anything.
    pub fn handle(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::SetQuery(query) => {
                if let Some(ticket) = self.search.set_query(query) {
                    self.watchlist.select(None);
                    self.spawn_search(ticket);
                }
                true
            }
            Intent::Select(id) => {
                if let Some(ticket) = self.watchlist.select(id.as_deref()) {
                    self.spawn_detail(ticket);
                }
                true
            }
            Intent::Rate(value) => self.watchlist.rate(value),
            Intent::Commit => self.watchlist.commit().is_some(),
            Intent::Remove(id) => self.watchlist.remove(&id),
        }
    }

    pub fn apply(&mut self, event: Event) {
        match event {
            Event::Search(outcome) => self.search.apply(outcome),
            Event::Detail(outcome) => self.watchlist.apply_detail(outcome),
        }
    }

    fn spawn_search(&self, ticket: SearchTicket) {
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = search::run(source.as_ref(), ticket).await;
            if events.send(Event::Search(outcome)).is_err() {
                debug!("Event channel closed, dropping search outcome");
            }
        });
    }

    fn spawn_detail(&self, ticket: DetailTicket) {
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = watchlist::run(source.as_ref(), ticket).await;
            if events.send(Event::Detail(outcome)).is_err() {
                debug!("Event channel closed, dropping detail outcome");
            }
        });
    }
}

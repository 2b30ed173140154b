//! Plain-text rendering of controller state. Nothing here mutates state.

use crate::models::{MovieDetail, WatchedEntry};
use crate::search::SearchController;
use crate::watchlist::{Summary, WatchlistController};
use std::fmt::Write;

pub fn render(search: &SearchController, watchlist: &WatchlistController) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", watchlist.page_title());
    out.push_str(&render_results(search));
    out.push('\n');
    if watchlist.selected().is_some() {
        out.push_str(&render_detail(watchlist));
    } else {
        out.push_str(&render_watched(watchlist));
    }
    out
}

pub fn render_results(search: &SearchController) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Search: {:?}  Found {} results", search.query(), search.movies().len());

    if search.is_loading() {
        out.push_str("Loading...\n");
    } else if let Some(error) = search.error() {
        let _ = writeln!(out, "⛔ {}", error);
    } else {
        for (i, movie) in search.movies().iter().enumerate() {
            let _ = writeln!(out, "{:>3}. {} ({}) [{}]", i + 1, movie.title, movie.year, movie.imdb_id);
        }
    }
    out
}

pub fn render_detail(watchlist: &WatchlistController) -> String {
    if watchlist.is_loading() {
        return "Loading...\n".to_string();
    }
    let mut out = String::new();
    if let Some(error) = watchlist.detail_error() {
        let _ = writeln!(out, "⛔ {}", error);
    }
    let Some(detail) = watchlist.detail() else {
        return out;
    };

    write_detail(&mut out, detail);
    match watchlist.already_rated() {
        Some(rating) => {
            let _ = writeln!(out, "You already rated this movie {} ⭐", rating);
        }
        None if watchlist.pending_rating() > 0 => {
            let _ = writeln!(out, "Your rating: {}/10  (type `add` to add to watched)", watchlist.pending_rating());
        }
        None => out.push_str("Rate it with `rate <1-10>`\n"),
    }
    out
}

fn write_detail(out: &mut String, detail: &MovieDetail) {
    let _ = writeln!(out, "{}", detail.title);
    let _ = writeln!(out, "{} • {}", detail.released, detail.runtime);
    let _ = writeln!(out, "{}", detail.genre);
    let _ = writeln!(out, "⭐ {} IMDB rating", detail.imdb_rating);
    let _ = writeln!(out, "{}", detail.plot);
    let _ = writeln!(out, "Starring {}", detail.actors);
    let _ = writeln!(out, "Directed by {}", detail.director);
}

pub fn render_watched(watchlist: &WatchlistController) -> String {
    let mut out = render_summary(&watchlist.summary());
    for entry in watchlist.watched() {
        write_entry(&mut out, entry);
    }
    out
}

pub fn render_summary(summary: &Summary) -> String {
    format!(
        "Movies you watched: {} movies  ⭐️ {:.2}  🌟 {:.2}  ⏳ {:.2} min\n",
        summary.count, summary.avg_imdb_rating, summary.avg_user_rating, summary.avg_runtime
    )
}

fn write_entry(out: &mut String, entry: &WatchedEntry) {
    let _ = writeln!(
        out,
        "  {} [{}]  ⭐️ {}  🌟 {}  ⏳ {} min",
        entry.title, entry.imdb_id, entry.imdb_rating, entry.user_rating, entry.runtime
    );
}

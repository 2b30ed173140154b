mod app;
mod cli;
mod config;
mod http;
mod models;
mod omdb;
mod search;
mod source;
mod view;
mod watchlist;

use anyhow::Result;
use app::{App, Intent};
use clap::Parser;
use cli::{Command, HELP};
use config::Configuration;
use http::HttpClient;
use omdb::OmdbClient;
use source::MovieSource;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// OMDb API key, overrides the configuration file
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they don't interleave with the view
    tracing_subscriber::fmt()
        .with_env_filter(&cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting popcorn v{}", env!("CARGO_PKG_VERSION"));

    let config = Configuration::load(&cli.config, cli.api_key.as_deref())?;
    info!("Configuration loaded, using {}", config.omdb.base_url);

    let http_client = HttpClient::new(config.request_timeout(), config.omdb.user_agent.as_deref())?;
    let omdb = OmdbClient::new(http_client, config.omdb.clone());
    let (mut app, mut events) = App::new(Arc::new(omdb));

    println!("{}", HELP);
    print!("{}", view::render(app.search(), app.watchlist()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match line.parse::<Command>() {
                    Ok(command) => {
                        if let Flow::Quit = execute(&mut app, command)? {
                            break;
                        }
                    }
                    Err(cli::ParseCommandError::Empty) => continue,
                    Err(e) => {
                        println!("{} (type `help`)", e);
                        continue;
                    }
                }
            }
            Some(event) = events.recv() => {
                app.apply(event);
            }
        }
        print!("{}", view::render(app.search(), app.watchlist()));
    }

    info!("Exiting with {} watched movies", app.watchlist().watched().len());
    Ok(())
}

fn execute<S: MovieSource + 'static>(app: &mut App<S>, command: Command) -> Result<Flow> {
    match command {
        Command::Search(query) => {
            app.handle(Intent::SetQuery(query));
        }
        Command::Open(n) => {
            let id = app.search().movies().get(n - 1).map(|m| m.imdb_id.clone());
            match id {
                Some(id) => {
                    app.handle(Intent::Select(Some(id)));
                }
                None => println!("No result #{}", n),
            }
        }
        Command::Select(id) => {
            app.handle(Intent::Select(Some(id)));
        }
        Command::Rate(value) => {
            if let Some(rating) = app.watchlist().already_rated() {
                println!("You already rated this movie {} ⭐", rating);
            } else if !app.handle(Intent::Rate(value)) {
                println!("Open a movie, wait for its details and rate it from 0 to 10");
            }
        }
        Command::Add => {
            if !app.handle(Intent::Commit) {
                warn!("Nothing to add");
                println!("Open a movie, wait for its details and rate it first");
            }
        }
        Command::Remove(id) => {
            if !app.handle(Intent::Remove(id.clone())) {
                println!("{} is not in your watched list", id);
            }
        }
        Command::Back => {
            app.handle(Intent::Select(None));
        }
        Command::Watched => print!("{}", view::render_watched(app.watchlist())),
        Command::Export => println!("{}", serde_json::to_string_pretty(app.watchlist().watched())?),
        Command::Help => println!("{}", HELP),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use library_browser::controller::LoadOutcome;
use library_browser::model::{Entity, LibraryTab, SearchRow};
use library_browser::{BrowserConfig, LibraryBrowser, RestBackend, logging};

#[derive(Parser)]
#[command(name = "library-browser", about = "Browse a music library backend from the terminal")]
struct Cli {
    /// Configuration file (defaults to $LIBRARY_BROWSER_CONFIG or ./library-browser.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search tracks, albums and artists
    Search { query: String },
    /// List tracks page by page
    Tracks {
        #[arg(long)]
        filter: Option<String>,
        /// Stop after this many pages
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// List albums
    Albums {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show an album and its tracks
    Album { id: i64 },
    /// Show an artist and their albums
    Artist { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = BrowserConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.backend.base_url = base_url;
    }

    let _log_guard = match logging::init_logging(&config.logging.dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!(base_url = %config.backend.base_url, "=== Library browser starting ===");

    let backend = Arc::new(RestBackend::new(config.backend.base_url.clone()));
    let browser = LibraryBrowser::new(backend, config);

    let result = run(&browser, cli.command).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Command failed");
    }
    tracing::info!("Library browser shutting down");
    result
}

async fn run(browser: &LibraryBrowser, command: Command) -> Result<()> {
    match command {
        Command::Search { query } => {
            let results = browser.search().search_now(&query).await;
            let state = browser.search().state().await;
            for kind in &state.degraded {
                eprintln!("warning: {} search failed", kind.label());
            }
            if results.is_empty() {
                println!("No results for \"{query}\"");
            }
            for row in results.rows() {
                match row {
                    SearchRow::Divider(kind) => println!("--- {}", kind.label()),
                    SearchRow::Result(r) => match &r.subtitle {
                        Some(subtitle) => println!("[{}] {} - {}", r.id, r.title, subtitle),
                        None => println!("[{}] {}", r.id, r.title),
                    },
                }
            }
        }
        Command::Tracks { filter, pages } => {
            list(browser, LibraryTab::Tracks, filter, pages).await?;
        }
        Command::Albums { filter } => {
            list(browser, LibraryTab::Albums, filter, usize::MAX).await?;
        }
        Command::Album { id } => {
            browser.open_album(id).await;
            let detail = browser.detail().await;
            let Some(album) = detail.album else {
                bail!(detail.error.unwrap_or_else(|| format!("album {id} not found")));
            };
            println!("{} - {}", album.title, album.artist);
            for track in album.tracks {
                let star = if track.favorite { "*" } else { " " };
                println!("{star} [{}] {}", track.id, track.title);
            }
        }
        Command::Artist { id } => {
            browser.open_artist(id).await;
            let detail = browser.detail().await;
            let Some(artist) = detail.artist else {
                bail!(detail.error.unwrap_or_else(|| format!("artist {id} not found")));
            };
            println!("{} ({} tracks)", artist.name, artist.total_tracks);
            for album in artist.albums {
                println!("  [{}] {}", album.id, album.title);
            }
        }
    }
    Ok(())
}

async fn list(browser: &LibraryBrowser, tab: LibraryTab, filter: Option<String>, pages: usize) -> Result<()> {
    let switched = browser.switch_tab(tab).await;
    let mut outcome = match (browser.set_filter(filter).await, switched) {
        (Some(outcome), _) | (None, Some(outcome)) => outcome,
        (None, None) => browser.mount().await,
    };

    let mut loaded = 1;
    while loaded < pages && matches!(outcome, LoadOutcome::Appended(_)) {
        outcome = browser.load_more().await;
        loaded += 1;
    }

    let page = browser.page().await;
    if let Some(error) = page.error {
        bail!(error);
    }
    for entity in &page.items {
        match entity {
            Entity::Track(t) => println!("[{}] {} - {}", t.id, t.title, t.artist),
            Entity::Album(a) => println!("[{}] {} - {}", a.id, a.title, a.artist),
            Entity::Artist(a) => println!("[{}] {}", a.id, a.name),
        }
    }
    if page.has_more {
        println!("... more available");
    }
    Ok(())
}

mod browse;
mod catalog;
mod config;
mod domain;
mod favorites;
mod ol_client;
mod storage;

use std::{path::Path, sync::Arc};

use anyhow::Context;
use browse::BookBrowser;
use catalog::{Catalog, OlCatalog};
use clap::{Parser, Subcommand};
use config::Config;
use favorites::{Favorites, FavoritesStore};
use migration::MigratorTrait;
use ol_client::{CoverSize, OlClient};
use sea_orm::Database;
use storage::SqlitePreferenceStore;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt::SubscriberBuilder, prelude::*};

type BookExplorerResult<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(
    name = "book-explorer",
    version,
    about = "Browse the Open Library catalog and keep local favorites"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the catalog and page through results
    Search {
        /// Query string; omit to browse the default feed
        query: Option<String>,
        /// Number of pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,
        /// Start from a random page-aligned offset
        #[arg(long)]
        shuffle: bool,
    },
    /// Show the full record for one work
    Show { work_id: String },
    /// Manage locally saved favorites
    #[command(subcommand)]
    Fav(FavCommand),
}

#[derive(Subcommand)]
enum FavCommand {
    /// List saved favorites
    List,
    /// Toggle a work in or out of the favorites
    Toggle { work_id: String },
}

#[tokio::main]
async fn main() -> BookExplorerResult<()> {
    // Initialize tracing (logs). Respect RUST_LOG if set, default to info for our crate and warn for deps.
    let default_filter = format!("{}=info,reqwest=warn,h2=warn", env!("CARGO_PKG_NAME"));
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .with_level(true)
        .pretty()
        .finish()
        .with(ErrorLayer::default())
        .init();

    // Load environment variables from .env files
    if Path::new(".env.local").exists() {
        dotenvy::from_filename(".env.local")?;
    } else if Path::new(".env").exists() {
        dotenvy::from_filename(".env")?;
    };

    let cli = Cli::parse();
    let config = Config::load();
    match config.validate() {
        Ok(_) => {}
        Err(e) => {
            return Err(anyhow::anyhow!(e));
        }
    }

    let db_conn = Database::connect(&config.db_connection_string)
        .await
        .with_context(|| "Failed to connect to database")?;

    migration::Migrator::up(&db_conn, None)
        .await
        .with_context(|| "Failed to run database migrations")?;

    let client = OlClient::new(&config.catalog_base_url, &config.covers_base_url)?;
    tracing::info!(catalog_base = %config.catalog_base_url, "configured catalog client");
    let catalog: Arc<dyn Catalog> = Arc::new(OlCatalog::new(client.clone()));

    let store = SqlitePreferenceStore::new(Arc::new(db_conn), "favorites");
    let favorites = Favorites::new(FavoritesStore::new(Arc::new(store)));

    match cli.command {
        Command::Search {
            query,
            pages,
            shuffle,
        } => run_search(catalog, &config, query.as_deref().unwrap_or(""), pages, shuffle).await,
        Command::Show { work_id } => run_show(catalog, &client, &favorites, &work_id).await,
        Command::Fav(FavCommand::List) => run_fav_list(&favorites).await,
        Command::Fav(FavCommand::Toggle { work_id }) => {
            run_fav_toggle(catalog, &favorites, &work_id).await
        }
    }
}

async fn run_search(
    catalog: Arc<dyn Catalog>,
    config: &Config,
    query: &str,
    pages: u32,
    shuffle: bool,
) -> BookExplorerResult<()> {
    let mut browser = BookBrowser::new(catalog)
        .with_page_size(config.page_size)
        .with_max_random_offset(config.max_random_offset)
        .with_query(query);
    if shuffle {
        browser.refresh(true).await;
    } else {
        browser.reset(query).await;
    }
    for _ in 1..pages {
        browser.load_next_page().await;
    }

    if browser.books().is_empty() {
        if let Some(err) = browser.last_error() {
            return Err(anyhow::anyhow!(err.to_string()));
        }
        println!("No books found.");
        return Ok(());
    }
    for book in browser.books() {
        let year = book
            .first_publish_year
            .map(|y| format!(" ({})", y))
            .unwrap_or_default();
        println!(
            "{:<14} {} by {}{}",
            book.work_id,
            book.title,
            book.author_line(),
            year
        );
    }
    // a failed later page leaves the fetched rows visible
    if let Some(err) = browser.last_error() {
        eprintln!("warning: {}", err);
    }
    Ok(())
}

async fn run_show(
    catalog: Arc<dyn Catalog>,
    client: &OlClient,
    favorites: &Favorites,
    work_id: &str,
) -> BookExplorerResult<()> {
    let detail = catalog.work_detail(work_id).await?;
    let starred = favorites.is_favorite(&detail.work_id).await?;

    println!("{}{}", detail.title, if starred { " ★" } else { "" });
    if let Some(date) = &detail.first_publish_date {
        println!("First published: {}", date);
    }
    println!();
    println!("{}", detail.description_text());
    if !detail.subjects.is_empty() {
        println!();
        println!("Subjects: {}", detail.subjects.join(", "));
    }
    if let Some(cover) = detail.cover_ids.first() {
        println!();
        println!("Cover: {}", client.cover_url(*cover, CoverSize::Large));
    }
    Ok(())
}

async fn run_fav_list(favorites: &Favorites) -> BookExplorerResult<()> {
    let books = favorites.list().await?;
    if books.is_empty() {
        println!("No favorites saved yet.");
        return Ok(());
    }
    for book in &books {
        println!("{:<14} {} by {}", book.work_id, book.title, book.author_line());
    }
    Ok(())
}

async fn run_fav_toggle(
    catalog: Arc<dyn Catalog>,
    favorites: &Favorites,
    work_id: &str,
) -> BookExplorerResult<()> {
    // the key: field query returns the work as a search doc, author
    // list included
    let query = format!("key:\"/works/{}\"", work_id);
    let results = catalog.search(&query, 1, 0).await?;
    let book = results
        .into_iter()
        .next()
        .with_context(|| format!("work {} not found in the catalog", work_id))?;

    if favorites.toggle(&book).await? {
        println!("Added \"{}\" to favorites.", book.title);
    } else {
        println!("Removed \"{}\" from favorites.", book.title);
    }
    Ok(())
}

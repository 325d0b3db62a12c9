use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, MovieId};
use engine::{RankedEntry, Recommender};
use server::AppState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// movie-recs - Movie Recommendation Backend
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Popularity and genre-based movie recommendations", long_about = None)]
struct Cli {
    /// Movie catalog file
    #[arg(long, global = true, env = "MOVIE_RECS_MOVIES", default_value = "data/movies_100k.csv")]
    movies: PathBuf,

    /// Ratings file
    #[arg(long, global = true, env = "MOVIE_RECS_RATINGS", default_value = "data/ratings_100k.csv")]
    ratings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, env = "MOVIE_RECS_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to bind
        #[arg(long, env = "MOVIE_RECS_PORT", default_value = "5000")]
        port: u16,
    },

    /// Recommend movies for a selection (popularity ranking when empty)
    Recommend {
        /// Comma-separated movie ids, e.g. 1,50,181
        #[arg(long, value_delimiter = ',')]
        select: Vec<MovieId>,
    },

    /// List the catalog
    Movies {
        /// Print at most this many movies
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Loading failures abort before anything is served
    let recommender = load_recommender(&cli.movies, &cli.ratings)?;

    match cli.command {
        Commands::Serve { host, port } => handle_serve(recommender, &host, port).await?,
        Commands::Recommend { select } => handle_recommend(&recommender, &select),
        Commands::Movies { limit } => handle_movies(&recommender, limit),
        Commands::Search { title } => handle_search(&recommender, &title),
    }

    Ok(())
}

fn load_recommender(movies: &Path, ratings: &Path) -> Result<Recommender> {
    println!(
        "Loading catalog {} and ratings {}...",
        movies.display(),
        ratings.display()
    );
    let start = Instant::now();
    let data_index = DataIndex::load_from_files(movies, ratings)
        .context("Failed to load movie data")?;
    let (movie_count, rating_count) = data_index.counts();
    println!(
        "{} Loaded {} movies and {} ratings in {:?}",
        "✓".green(),
        movie_count,
        rating_count,
        start.elapsed()
    );
    Ok(Recommender::new(Arc::new(data_index)))
}

/// Handle the 'serve' command
async fn handle_serve(recommender: Recommender, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Serving movie recommendations on {}", addr);

    server::serve(listener, AppState::ready(recommender))
        .await
        .context("Server error")?;
    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(recommender: &Recommender, select: &[MovieId]) {
    let entries = recommender.recommend(select);
    let mode = if select.is_empty() {
        "Popular movies"
    } else {
        "Recommended for your selection"
    };
    println!("{}", format!("{}:", mode).bold().blue());
    print_ranked(&entries);
}

/// Handle the 'movies' command
fn handle_movies(recommender: &Recommender, limit: Option<usize>) {
    let catalog = recommender.list_catalog();
    let shown = limit.unwrap_or(catalog.len());
    println!("{}", format!("Catalog ({} movies):", catalog.len()).bold().blue());
    for entry in catalog.iter().take(shown) {
        println!("{}: {} [{}]", entry.id.to_string().green(), entry.title, entry.genres);
    }
}

/// Handle the 'search' command
fn handle_search(recommender: &Recommender, title: &str) {
    let hits = recommender.search(title);
    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if hits.is_empty() {
        println!("  no movie title contains '{}'", title);
        return;
    }
    // Display top 20 results with rating stats
    for hit in hits.iter().take(20) {
        let avg = hit
            .avg_rating
            .map_or_else(|| "-".to_string(), |avg| format!("{:.2}", avg));
        println!(
            "{}: {} [{}] avg {} ({} ratings)",
            hit.entry.id.to_string().green(),
            hit.entry.title,
            hit.entry.genres,
            avg,
            hit.rating_count
        );
    }
}

fn print_ranked(entries: &[RankedEntry]) {
    if entries.is_empty() {
        println!("  nothing to recommend");
        return;
    }
    for (i, entry) in entries.iter().enumerate() {
        let rating = entry
            .avg_rating
            .map_or_else(|| "no rating".to_string(), |avg| format!("avg {:.2}", avg));
        println!(
            "{}. {} [{}] - {} (id {})",
            (i + 1).to_string().green(),
            entry.title,
            entry.genres,
            rating,
            entry.id
        );
    }
}

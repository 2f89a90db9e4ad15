use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{MovieId, RatingStore, UserId, NO_RATING};
use evaluation::{run_evaluation, EvaluationResult};
use knn::Predictor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// movie-knn - k-nearest-neighbor rating predictions for MovieLens 100k
#[derive(Parser)]
#[command(name = "movie-knn")]
#[command(about = "Predict movie ratings with user-based collaborative filtering", long_about = None)]
struct Cli {
    /// Path to the MovieLens 100k directory
    #[arg(short, long, default_value = "data/ml-100k")]
    data_dir: PathBuf,

    /// Split to load, e.g. "u1" for u1.base/u1.test (default: u.data, no test set)
    #[arg(short, long)]
    split: Option<String>,

    /// Exponent p in the per-movie distance |r1 - r2|^p
    #[arg(short, long, default_value_t = knn::DEFAULT_DISTANCE_EXPONENT)]
    exponent: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the test split and report error statistics
    Evaluate {
        /// Only evaluate the first N test ratings
        #[arg(long)]
        limit: Option<usize>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Predict how a user would rate a movie
    Predict {
        #[arg(long)]
        user: UserId,

        #[arg(long)]
        movie: MovieId,
    },

    /// Show the training rating a user gave a movie
    Rating {
        #[arg(long)]
        user: UserId,

        #[arg(long)]
        movie: MovieId,
    },

    /// List the movies a user rated
    Movies {
        #[arg(long)]
        user: UserId,
    },

    /// List the users who rated a movie
    Viewers {
        #[arg(long)]
        movie: MovieId,
    },

    /// Show a user's most similar users
    Neighbors {
        #[arg(long)]
        user: UserId,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let start = Instant::now();
    let store = RatingStore::load(&cli.data_dir, cli.split.as_deref())
        .with_context(|| format!("Failed to load ratings from {}", cli.data_dir.display()))?;
    info!("Loaded rating store in {:?}", start.elapsed());

    let mut predictor = Predictor::new(Arc::new(store)).with_distance_exponent(cli.exponent);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Evaluate { limit, json } => handle_evaluate(&mut predictor, limit, json)?,
        Commands::Predict { user, movie } => {
            let estimate = predictor.predict(user, movie);
            println!(
                "User {} would rate movie {}: {}",
                user,
                movie,
                format!("{:.2}", estimate).green().bold()
            );
        }
        Commands::Rating { user, movie } => match predictor.rating(user, movie) {
            NO_RATING => println!("User {} did not rate movie {}", user, movie),
            rating => println!("User {} rated movie {}: {}", user, movie, rating.to_string().green()),
        },
        Commands::Movies { user } => {
            let movies = predictor.movies(user);
            println!("{}", format!("User {} rated {} movies:", user, movies.len()).bold().blue());
            print_ids(&movies);
        }
        Commands::Viewers { movie } => {
            let viewers = predictor.viewers(movie);
            println!("{}", format!("Movie {} was rated by {} users:", movie, viewers.len()).bold().blue());
            print_ids(&viewers);
        }
        Commands::Neighbors { user } => handle_neighbors(&mut predictor, user),
    }

    Ok(())
}

/// Handle the 'evaluate' command
fn handle_evaluate(predictor: &mut Predictor, limit: Option<usize>, json: bool) -> Result<()> {
    let start = Instant::now();
    let result = run_evaluation(predictor, limit).context("Evaluation needs a split, try --split u1")?;
    info!("Evaluated {} ratings in {:?}", result.len(), start.elapsed());

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_summary(&result);
    Ok(())
}

/// Handle the 'neighbors' command
fn handle_neighbors(predictor: &mut Predictor, user: UserId) {
    let neighbors = predictor.neighbors_with_similarity(user);
    println!("{}", format!("Nearest neighbors of user {}:", user).bold().blue());
    for (uid, similarity) in neighbors {
        println!("  {} user {} (similarity {:.3})", "•".green(), uid, similarity);
    }
}

/// Helper function to print evaluation statistics
fn print_summary(result: &EvaluationResult) {
    println!("{}", format!("Evaluated {} test ratings", result.len()).bold().blue());

    let stats = [
        ("Mean", result.mean()),
        ("Std", result.stddev()),
        ("Rms", result.rms()),
    ];
    for (label, value) in stats {
        match value {
            Ok(v) => println!("{} {} = {:.4}", "•".cyan(), label, v),
            Err(e) => println!("{} {} = {}", "•".cyan(), label, e.to_string().yellow()),
        }
    }

    if let Some(last) = result.to_rows().last() {
        println!("Last prediction [user, movie, rating, prediction]: {:?}", last);
    }
}

/// Print ids ten per line
fn print_ids(ids: &[u32]) {
    for chunk in ids.chunks(10) {
        let line = chunk.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ");
        println!("  {}", line);
    }
}

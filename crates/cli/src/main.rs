//! Deckhand CLI — the main entry point.
//!
//! Commands:
//! - `run`      — Start the autonomous decision loop
//! - `advise`   — One-shot reasoning over the given context
//! - `optimize` — Run the deck optimizer directly on a deck file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "deckhand",
    about = "Deckhand — autonomous card-game assistant agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true, default_value = "deckhand.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the autonomous decision loop
    Run {
        /// Deck file (JSON) to load into the agent's context
        #[arg(short, long)]
        deck: Option<PathBuf>,

        /// An initial message from the player
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Decide the next action once and print the reasoning trace
    Advise {
        /// Deck file (JSON) to load into the agent's context
        #[arg(short, long)]
        deck: Option<PathBuf>,

        /// A message from the player
        #[arg(short, long)]
        input: Option<String>,

        /// Current turn number
        #[arg(short, long, default_value_t = 0)]
        turn: u32,

        /// Number of decision steps to take
        #[arg(short, long, default_value_t = 1)]
        steps: u32,
    },

    /// Optimize a deck file and print the suggestions
    Optimize {
        /// Deck file (JSON)
        deck: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run { deck, input } => commands::run::run(&cli.config, deck, input).await?,
        Commands::Advise {
            deck,
            input,
            turn,
            steps,
        } => commands::advise::run(deck, input, turn, steps).await?,
        Commands::Optimize { deck } => commands::optimize::run(&deck).await?,
    }

    Ok(())
}

mod build_dataset;
mod fetch;
mod fetch_games;
mod inspect;
mod sample_writer;

use build_dataset::{build_dataset, BuildDatasetCommand};
use clap::{Parser, Subcommand};
use fetch_games::{fetch, FetchCommand};
use inspect::{inspect, InspectCommand};
use std::error::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Downloads every archived game of a chess.com player into a .json file
    Fetch(FetchCommand),
    /// Builds a dataset of (position, moved-from square) samples from a player's games
    BuildDataset(BuildDatasetCommand),
    /// Prints the positions and labels extracted from a single PGN game
    Inspect(InspectCommand),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    match args.command {
        Commands::Fetch(cmd) => fetch(cmd),
        Commands::BuildDataset(cmd) => build_dataset(cmd),
        Commands::Inspect(cmd) => inspect(cmd),
    }
}

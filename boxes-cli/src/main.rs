//! Boxes CLI - Command-line interface
//!
//! Commands:
//! - play: Play games between two configured players
//! - benchmark: Time the alpha-beta search at increasing plies

mod benchmark;
mod play_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "boxes")]
#[command(about = "Dots-and-boxes with an alpha-beta search player")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one or more games
    Play(play_cmd::PlayArgs),
    /// Benchmark search time per ply
    Benchmark(benchmark::BenchmarkArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG overrides the default level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Benchmark(args) => benchmark::run(args, cli.seed),
    }
}

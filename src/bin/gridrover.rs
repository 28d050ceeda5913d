//! gridrover CLI - Q-learning explorer for remote grid worlds

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gridrover")]
#[command(version, about = "Q-learning explorer for remote grid worlds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to a simulator and learn for N episodes
    Run(gridrover::cli::run::RunArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => gridrover::cli::run::execute(args),
    }
}

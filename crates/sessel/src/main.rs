use anyhow::Result;
use clap::Parser;

mod check_cmd;
mod cli;
mod pool;
mod simulate_cmd;
mod tally_cmd;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing (output to stderr, initialize only once)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();
    let format = cli.format;

    match cli.command {
        Commands::Simulate {
            scenario,
            rounds,
            seed,
        } => simulate_cmd::handle_simulate(&scenario, rounds, seed, format),
        Commands::Tally {
            scenario,
            trials,
            seed,
        } => tally_cmd::handle_tally(&scenario, trials, seed, format),
        Commands::Check { scenario } => check_cmd::handle_check(&scenario, format),
    }
}

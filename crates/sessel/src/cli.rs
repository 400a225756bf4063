use clap::{Parser, Subcommand};
use sessel_core::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sessel")]
#[command(about = "Drive a broadcast session selector over a scenario file")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill a selector from a scenario and select until the pool is empty
    Simulate {
        /// Scenario file (TOML)
        scenario: PathBuf,

        /// Number of select calls (defaults to the pool size)
        #[arg(long)]
        rounds: Option<usize>,

        /// Override the selector seed from the scenario
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Repeat a single selection on a fresh pool and report how often each session wins
    Tally {
        /// Scenario file (TOML)
        scenario: PathBuf,

        /// Number of independent trials
        #[arg(long, default_value_t = 1000)]
        trials: usize,

        /// Base seed; trial N uses seed + N
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Validate a scenario file and print a summary
    Check {
        /// Scenario file (TOML)
        scenario: PathBuf,
    },
}

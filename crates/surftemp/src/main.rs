// crates/surftemp/src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod report;

use commands::correlate::{handle_correlate, CorrelateArgs};
use commands::daily::{handle_daily, DailyArgs};

/// Correlates satellite land-surface temperature with ground logger readings.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match a satellite export against a ground export and report accuracy
    Correlate(CorrelateArgs),
    /// Print per-day mean values of a ground export
    Daily(DailyArgs),
    /// Print the default engine configuration as TOML
    DefaultConfig,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Correlate(args) => handle_correlate(args),
        Command::Daily(args) => handle_daily(args),
        Command::DefaultConfig => {
            let text = surftemp_core::EngineConfig::default().to_toml_string()?;
            print!("{text}");
            Ok(())
        }
    }
}

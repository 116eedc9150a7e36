mod app;
mod cli;
mod persistence;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use export_logging::{export_info, export_warn, LogDestination, DEFAULT_LOG_FILE};

fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = cli::Cli::parse();

    let destination = if cli.log_file {
        LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE))
    } else {
        LogDestination::Terminal
    };
    export_logging::initialize(destination, cli.log_level);

    log_dotenv_outcome(&dotenv);

    let report = app::run(cli)?;
    println!("{report}");
    Ok(())
}

/// Returns true when a `.env` file exists but could not be used.
fn log_dotenv_outcome(outcome: &Result<PathBuf, dotenvy::Error>) -> bool {
    match outcome {
        Ok(path) => {
            export_info!("Loaded settings from {:?}", path);
            false
        }
        // A missing .env file is fine; the environment and flags still apply.
        Err(err) if err.not_found() => false,
        Err(err) => {
            export_warn!("Ignoring unreadable .env file: {}", err);
            true
        }
    }
}

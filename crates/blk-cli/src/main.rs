//! BLK toolkit CLI
//!
//! Parse, format and inspect BLK configuration documents.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("failed to set tracing subscriber");
        tracing::debug!("verbose mode enabled");
    }

    match cli.command {
        Commands::Check {
            file,
            validator_log,
            json,
        } => commands::check(&file, validator_log.as_deref(), json),
        Commands::Format { file, write, check } => commands::format(&file, write, check),
        Commands::Deps { file, config, json } => commands::deps(&file, config.as_deref(), json),
    }
}

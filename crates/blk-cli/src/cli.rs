//! Argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "blk", about = "Tooling for BLK configuration documents", version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a document and report diagnostics
    Check {
        /// BLK file to check
        file: PathBuf,

        /// Merge diagnostics from a captured external validator log
        #[arg(long)]
        validator_log: Option<PathBuf>,

        /// Emit diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print or apply the canonical formatting
    Format {
        /// BLK file to format
        file: PathBuf,

        /// Rewrite the file in place
        #[arg(long)]
        write: bool,

        /// Exit nonzero if the file is not canonically formatted
        #[arg(long, conflicts_with = "write")]
        check: bool,
    },

    /// Print the include dependency tree
    Deps {
        /// Root BLK file
        file: PathBuf,

        /// Resolver configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit the tree as JSON
        #[arg(long)]
        json: bool,
    },
}

//! CLI error type

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] blk_fs::Error),

    #[error("Dependency resolution error: {0}")]
    Deps(#[from] blk_deps::Error),

    #[error("{count} problem(s) found in {path}")]
    ChecksFailed { path: PathBuf, count: usize },

    #[error("{path} is not canonically formatted")]
    NotCanonical { path: PathBuf },

    #[error("cannot format {path}: document has parse errors")]
    FormatRejected { path: PathBuf },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to start async runtime: {0}")]
    Runtime(std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

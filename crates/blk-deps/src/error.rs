//! Error types for blk-deps

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] blk_fs::Error),

    #[error("Failed to parse resolver config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },
}

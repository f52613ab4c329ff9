//! Error-carrying file reads

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Read a file to a string, attaching the path to any I/O failure.
pub fn read_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    if path.exists() && !path.is_file() {
        return Err(Error::NotAFile {
            path: path.to_path_buf(),
        });
    }
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

//! Resolver configuration
//!
//! Loaded from a TOML file or constructed in code. A missing config file
//! yields the defaults; invalid TOML is an error.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use blk_fs::NormalizedPath;

use crate::error::{Error, Result};

/// Configuration consumed by the path resolver and dependency graph builder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Project root used by the root-absolute (`#`) scheme and as the base
    /// for relative search directories.
    pub root: Option<String>,

    /// Mount name -> absolute directory. Names are accepted with or without
    /// the leading `%`.
    pub mount_points: HashMap<String, String>,

    /// Ordered fallback directories for the bare-string scheme. Relative
    /// entries are joined under `root`.
    pub search_dirs: Vec<String>,

    /// Base directory probed first by the bare-string scheme. Defaults to
    /// `<root>/develop/gameBase`.
    pub game_base: Option<String>,

    pub dependency_tree: DependencyTreeConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyTreeConfig {
    /// `blockPath/paramName` entries whose values are treated as includes.
    pub read_params: Vec<String>,
}

impl ResolverConfig {
    /// Load configuration from a TOML file. A missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            tracing::debug!(?path, "no resolver config found, using defaults");
            return Ok(Self::default());
        }
        let content = blk_fs::read_file(path)?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Look up a mount point, accepting the name with or without `%`.
    pub fn mount(&self, name: &str) -> Option<&str> {
        let stripped = name.strip_prefix('%').unwrap_or(name);
        self.mount_points
            .get(stripped)
            .or_else(|| self.mount_points.get(&format!("%{stripped}")))
            .map(String::as_str)
    }

    pub fn root_path(&self) -> Option<NormalizedPath> {
        self.root.as_deref().map(NormalizedPath::new)
    }

    /// The conventional base directory probed first by the bare-string
    /// scheme.
    pub fn game_base_path(&self) -> Option<NormalizedPath> {
        match &self.game_base {
            Some(dir) => Some(NormalizedPath::new(dir)),
            None => self.root_path().map(|r| r.join("develop/gameBase")),
        }
    }

    /// Search directories with relative entries joined under `root`.
    pub fn search_dir_paths(&self) -> Vec<NormalizedPath> {
        self.search_dirs
            .iter()
            .map(|dir| {
                let normalized = NormalizedPath::new(dir);
                if normalized.as_str().starts_with('/') || dir.contains(':') {
                    normalized
                } else {
                    match self.root_path() {
                        Some(root) => root.join(dir),
                        None => normalized,
                    }
                }
            })
            .collect()
    }
}

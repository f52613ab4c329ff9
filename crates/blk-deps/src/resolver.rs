//! Include path resolution
//!
//! Addressing schemes are tried in fixed priority order: mount-point,
//! root-absolute, document-relative, then the bare-string fallback. Every
//! candidate is normalized and must exist on disk; an include that resolves
//! to nothing is a normal outcome, not an error.

use blk_fs::NormalizedPath;

use crate::config::ResolverConfig;

/// Resolves include directive strings to absolute paths.
#[derive(Debug, Clone)]
pub struct IncludeResolver {
    config: ResolverConfig,
}

impl IncludeResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve an include directive's raw path against the directory of the
    /// including document, trying every scheme in priority order.
    pub fn resolve(&self, raw: &str, doc_dir: &NormalizedPath) -> Option<NormalizedPath> {
        self.resolve_directive(raw, doc_dir)
            .or_else(|| self.resolve_bare(raw))
    }

    /// Schemes 1-3: mount-point, root-absolute, document-relative.
    pub fn resolve_directive(&self, raw: &str, doc_dir: &NormalizedPath) -> Option<NormalizedPath> {
        if let Some(rest) = raw.strip_prefix('%') {
            return self.resolve_mount(rest);
        }
        if let Some(rest) = raw.strip_prefix('#') {
            let root = self.config.root_path()?;
            return existing(root.join(rest));
        }
        existing(doc_dir.join(raw))
    }

    /// Scheme 4: a bare `*.blk` string found outside the include grammar.
    /// Probes the conventional game-base directory, re-checks the mount
    /// table for `%`-prefixed strings, then walks the configured search
    /// directories in order.
    pub fn resolve_bare(&self, raw: &str) -> Option<NormalizedPath> {
        if !raw.ends_with(".blk") {
            return None;
        }

        if let Some(base) = self.config.game_base_path() {
            if let Some(found) = existing(base.join(raw)) {
                return Some(found);
            }
        }

        if let Some(rest) = raw.strip_prefix('%') {
            if let Some(found) = self.resolve_mount(rest) {
                return Some(found);
            }
        }

        for dir in self.config.search_dir_paths() {
            if let Some(found) = existing(dir.join(raw)) {
                return Some(found);
            }
        }

        tracing::debug!(raw, "include did not resolve under any scheme");
        None
    }

    fn resolve_mount(&self, rest: &str) -> Option<NormalizedPath> {
        let (mount_name, remainder) = match rest.split_once('/') {
            Some((name, remainder)) => (name, remainder),
            None => (rest, ""),
        };
        let base = self.config.mount(mount_name)?;
        let candidate = if remainder.is_empty() {
            NormalizedPath::new(base)
        } else {
            NormalizedPath::new(base).join(remainder)
        };
        existing(candidate)
    }
}

fn existing(candidate: NormalizedPath) -> Option<NormalizedPath> {
    let normalized = candidate.normalize();
    if normalized.is_file() {
        Some(normalized)
    } else {
        None
    }
}

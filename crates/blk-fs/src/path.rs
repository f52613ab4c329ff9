//! Normalized path handling for cross-platform include resolution

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Include directives mix `/` and `\` freely and often contain `.`/`..`
/// segments. All paths are stored with forward slashes and converted to
/// platform-native format only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self { inner: joined }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next()
    }

    /// Resolve `.` and `..` segments lexically, without touching the disk.
    ///
    /// A `..` at the root (or one that would climb past the first segment of
    /// a relative path) is kept as-is rather than dropped, so an unresolvable
    /// path stays visibly unresolvable.
    pub fn normalize(&self) -> Self {
        let absolute = self.inner.starts_with('/');
        let mut out: Vec<&str> = Vec::new();
        for segment in self.inner.split('/') {
            match segment {
                "" | "." => {}
                ".." => match out.last() {
                    Some(&last) if last != ".." => {
                        out.pop();
                    }
                    _ if absolute => {}
                    _ => out.push(segment),
                },
                _ => out.push(segment),
            }
        }
        let mut inner = out.join("/");
        if absolute {
            inner.insert(0, '/');
        } else if inner.is_empty() {
            inner.push('.');
        }
        Self { inner }
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn backslashes_are_normalized() {
        let p = NormalizedPath::new(r"gamedata\weapons\gun.blk");
        assert_eq!(p.as_str(), "gamedata/weapons/gun.blk");
    }

    #[test]
    fn join_inserts_single_separator() {
        let p = NormalizedPath::new("/data/");
        assert_eq!(p.join("x.blk").as_str(), "/data/x.blk");
        let q = NormalizedPath::new("/data");
        assert_eq!(q.join("x.blk").as_str(), "/data/x.blk");
    }

    #[test]
    fn normalize_resolves_dot_segments() {
        let p = NormalizedPath::new("/root/a/./b/../c.blk");
        assert_eq!(p.normalize().as_str(), "/root/a/c.blk");
    }

    #[test]
    fn normalize_keeps_leading_parent_segments_for_relative_paths() {
        let p = NormalizedPath::new("../shared/common.blk");
        assert_eq!(p.normalize().as_str(), "../shared/common.blk");
    }

    #[test]
    fn normalize_clamps_parent_at_root() {
        let p = NormalizedPath::new("/../x.blk");
        assert_eq!(p.normalize().as_str(), "/x.blk");
    }

    #[test]
    fn parent_and_file_name() {
        let p = NormalizedPath::new("/data/maps/level.blk");
        assert_eq!(p.parent().unwrap().as_str(), "/data/maps");
        assert_eq!(p.file_name(), Some("level.blk"));
        assert_eq!(p.extension(), Some("blk"));
    }
}

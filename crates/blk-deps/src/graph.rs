//! Dependency graph building
//!
//! Recursively applies the parser and path resolver to produce the tree of
//! include relationships reachable from a root document. Sibling subtrees
//! build concurrently; file reads are bounded by a semaphore and the whole
//! walk honors cooperative cancellation. Unresolved or unparseable targets
//! become leaf nodes rather than aborting the walk.

use std::collections::HashSet;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use blk_fs::NormalizedPath;
use blk_lang::tree::Block;

use crate::config::ResolverConfig;
use crate::resolver::IncludeResolver;

/// Cap on simultaneous in-flight file reads.
const MAX_CONCURRENT_READS: usize = 8;

/// One node of the include tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DepNode {
    /// Display name: the raw include string, or the root file's name.
    pub name: String,
    /// Normalized absolute path, absent when resolution failed.
    pub resolved_path: Option<String>,
    pub children: Vec<DepNode>,
}

impl DepNode {
    fn leaf(name: String, resolved_path: Option<String>) -> Self {
        Self {
            name,
            resolved_path,
            children: Vec::new(),
        }
    }
}

/// Builds include trees for BLK documents.
#[derive(Clone)]
pub struct DepTreeBuilder {
    inner: Arc<Inner>,
}

struct Inner {
    resolver: IncludeResolver,
    cancel: CancellationToken,
    read_slots: Semaphore,
    /// Serializes whole-tree builds on one builder; concurrent callers
    /// queue on the lock instead of polling a busy flag.
    build_guard: tokio::sync::Mutex<()>,
}

impl DepTreeBuilder {
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_cancellation(config, CancellationToken::new())
    }

    /// Build with a caller-supplied cancellation token. Cancellation stops
    /// descent between node expansions; already-built nodes are returned
    /// as-is.
    pub fn with_cancellation(config: ResolverConfig, cancel: CancellationToken) -> Self {
        Self {
            inner: Arc::new(Inner {
                resolver: IncludeResolver::new(config),
                cancel,
                read_slots: Semaphore::new(MAX_CONCURRENT_READS),
                build_guard: tokio::sync::Mutex::new(()),
            }),
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }

    pub fn resolver(&self) -> &IncludeResolver {
        &self.inner.resolver
    }

    /// Build the include tree rooted at a document on disk. At most one
    /// build runs per builder at a time; overlapping calls wait their turn.
    pub async fn build(&self, root_file: impl AsRef<Path>) -> DepNode {
        let _in_flight = self.inner.build_guard.lock().await;
        let path = NormalizedPath::new(root_file.as_ref()).normalize();
        let name = path
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| path.as_str().to_string());
        let resolved = path.is_file().then(|| path.clone());
        self.clone()
            .build_node(name, resolved, Arc::new(HashSet::new()))
            .await
    }

    /// Recursion is broken with a boxed future so subtrees can be spawned
    /// as independent tasks.
    fn build_node(
        self,
        name: String,
        path: Option<NormalizedPath>,
        visited: Arc<HashSet<String>>,
    ) -> Pin<Box<dyn Future<Output = DepNode> + Send>> {
        Box::pin(async move {
            let Some(path) = path else {
                return DepNode::leaf(name, None);
            };
            let resolved_path = Some(path.as_str().to_string());

            if self.inner.cancel.is_cancelled() {
                tracing::debug!(%path, "dependency tree build cancelled");
                return DepNode::leaf(name, resolved_path);
            }

            let source = {
                let _permit = self
                    .inner
                    .read_slots
                    .acquire()
                    .await
                    .expect("read semaphore never closed");
                match tokio::fs::read_to_string(path.to_native()).await {
                    Ok(source) => source,
                    Err(error) => {
                        tracing::warn!(%path, %error, "failed to read include target");
                        return DepNode::leaf(name, resolved_path);
                    }
                }
            };

            let doc = blk_lang::parse(&source);
            if !doc.is_clean() {
                tracing::warn!(
                    %path,
                    errors = doc.diagnostics.len(),
                    "include target failed to parse"
                );
                return DepNode::leaf(name, resolved_path);
            }

            let doc_dir = path
                .parent()
                .unwrap_or_else(|| NormalizedPath::new("."));
            let read_params = &self.inner.resolver.config().dependency_tree.read_params;
            let mut refs = Vec::new();
            collect_refs(&doc.root, "", read_params, &mut refs);

            let mut chain: HashSet<String> = (*visited).clone();
            chain.insert(path.as_str().to_string());
            let chain = Arc::new(chain);

            enum Pending {
                Done(DepNode),
                Task(tokio::task::JoinHandle<DepNode>),
            }

            let mut pending = Vec::with_capacity(refs.len());
            for include_ref in refs {
                let target = match include_ref.kind {
                    RefKind::Include => self.inner.resolver.resolve(&include_ref.raw, &doc_dir),
                    RefKind::WatchParam => self.inner.resolver.resolve_bare(&include_ref.raw),
                };
                match target {
                    Some(target) if chain.contains(target.as_str()) => {
                        tracing::debug!(raw = %include_ref.raw, "include cycle, stopping descent");
                        pending.push(Pending::Done(DepNode::leaf(
                            include_ref.raw,
                            Some(target.as_str().to_string()),
                        )));
                    }
                    target => {
                        let task = tokio::spawn(self.clone().build_node(
                            include_ref.raw,
                            target,
                            chain.clone(),
                        ));
                        pending.push(Pending::Task(task));
                    }
                }
            }

            let mut children = Vec::with_capacity(pending.len());
            for entry in pending {
                match entry {
                    Pending::Done(node) => children.push(node),
                    Pending::Task(task) => match task.await {
                        Ok(node) => children.push(node),
                        Err(error) => {
                            tracing::warn!(%error, "dependency subtree task failed");
                        }
                    },
                }
            }

            DepNode {
                name,
                resolved_path,
                children,
            }
        })
    }
}

enum RefKind {
    Include,
    WatchParam,
}

struct IncludeRef {
    raw: String,
    kind: RefKind,
}

/// Collect include directives and watch-listed param values, deduplicated
/// per block scope. The same target may appear once per distinct including
/// block.
fn collect_refs(block: &Block, block_path: &str, read_params: &[String], out: &mut Vec<IncludeRef>) {
    let mut seen: HashSet<String> = HashSet::new();

    for include in &block.includes {
        if seen.insert(include.raw_path.clone()) {
            out.push(IncludeRef {
                raw: include.raw_path.clone(),
                kind: RefKind::Include,
            });
        }
    }

    for param in &block.params {
        let key = if block_path.is_empty() {
            param.unquoted_name().to_string()
        } else {
            format!("{block_path}/{}", param.unquoted_name())
        };
        if read_params.iter().any(|entry| *entry == key) {
            let value = unquote(&param.value).to_string();
            if value.ends_with(".blk") && seen.insert(value.clone()) {
                out.push(IncludeRef {
                    raw: value,
                    kind: RefKind::WatchParam,
                });
            }
        }
    }

    for sub in &block.blocks {
        let name = sub.unquoted_name();
        let child_path = if block_path.is_empty() {
            name.to_string()
        } else {
            format!("{block_path}/{name}")
        };
        collect_refs(sub, &child_path, read_params, out);
    }
}

fn unquote(s: &str) -> &str {
    let s = s.trim();
    if s.len() >= 2 {
        let bytes = s.as_bytes();
        if (bytes[0] == b'"' || bytes[0] == b'\'') && bytes[s.len() - 1] == bytes[0] {
            return &s[1..s.len() - 1];
        }
    }
    s
}

//! Include resolution and dependency graph building for BLK documents.
//!
//! An `include` directive addresses its target under one of four schemes:
//! mount-point (`%assets/x.blk`), root-absolute (`#prog/x.blk`),
//! document-relative (`x.blk`), or a bare `*.blk` string probed against a
//! set of conventional directories. The [`DepTreeBuilder`] applies the
//! resolver recursively to produce the tree of include relationships
//! reachable from a document.

pub mod config;
pub mod error;
pub mod graph;
pub mod resolver;

pub use config::{DependencyTreeConfig, ResolverConfig};
pub use error::{Error, Result};
pub use graph::{DepNode, DepTreeBuilder};
pub use resolver::IncludeResolver;

//! Canonical formatter for BLK documents.
//!
//! Rewrites a parsed block tree into its canonical textual form and derives
//! the minimal set of text replacements against the original source.
//! Formatting is refused whenever the document does not parse cleanly:
//! a failed parse must never leave partially-applied edits.
//!
//! ```
//! use blk_format::{FormatOutcome, format_document};
//!
//! match format_document("a{x:i=1;}\n") {
//!     FormatOutcome::Edits(edits) => assert!(!edits.is_empty()),
//!     FormatOutcome::Rejected(_) => unreachable!("document parses cleanly"),
//! }
//! ```

pub mod edits;
pub mod render;

pub use edits::{FormatOutcome, TextEdit, apply_edits, format_document, format_range, minimal_edits};
pub use render::{BlockClass, canonical_text, classify};

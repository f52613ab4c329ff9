//! Lexer, parser and value validation for the BLK configuration format.
//!
//! BLK is a hierarchical, strongly-typed configuration text format: nested
//! named blocks containing typed key/value parameters, sub-blocks, file
//! includes and comments. This crate turns raw BLK text into a [`Document`]
//! (a block tree plus diagnostics) while tolerating and localizing syntax
//! errors - a malformed line never prevents the rest of the file from
//! parsing.
//!
//! ```
//! let doc = blk_lang::parse("entity {\n  hp:i = 100\n}\n");
//! assert!(doc.is_clean());
//! assert_eq!(doc.root.blocks[0].name, "entity");
//! assert_eq!(doc.root.blocks[0].params[0].value, "100");
//! ```

pub mod diagnostics;
pub mod external;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod tree;
pub mod values;

pub use diagnostics::{Diagnostic, ParseErrorKind, Severity};
pub use external::{ExternalDiagnostic, parse_validator_output};
pub use parser::parse;
pub use span::{LineIndex, Span};
pub use tree::{BlankRun, Block, Comment, Document, Include, Param};
pub use values::{ValueError, validate_value};

//! Parse diagnostics
//!
//! Syntax errors are recovered locally and collected as diagnostics anchored
//! to a source line; they never abort tree construction.

use serde::Serialize;

use crate::span::Span;

/// Diagnostic severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

/// The closed set of parser-level error kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ParseErrorKind {
    /// A `}` without an open block, or a block left open at end of input.
    UnmatchedBrace,
    /// Content matching no production.
    UnknownToken,
    /// A type tag absent from the value grammar table.
    UnknownParamType,
    /// A value that does not match its tag's shape.
    InvalidParamValue,
}

/// A recovered syntax error, anchored to a source line.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    pub span: Span,
    pub kind: ParseErrorKind,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn error(span: Span, kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            span,
            kind,
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.span.line, self.message)
    }
}

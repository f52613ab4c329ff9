//! Edit derivation
//!
//! The canonical rendering is compared against the original source with a
//! line diff, producing a minimal, non-overlapping, ordered list of
//! replacements. Already-canonical text yields zero edits.

use serde::Serialize;
use similar::{DiffOp, TextDiff};

use blk_lang::diagnostics::Diagnostic;
use blk_lang::span::{LineIndex, Span};

use crate::render::canonical_text;

/// A single text replacement against the original source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    /// Range to replace in the original text.
    pub span: Span,
    pub replacement: String,
}

/// Result of a format request.
#[derive(Clone, Debug)]
pub enum FormatOutcome {
    /// The document parsed cleanly; applying these edits in order yields the
    /// canonical form. Empty when the text is already canonical.
    Edits(Vec<TextEdit>),
    /// The document did not parse cleanly; no edits are produced and the
    /// caller should surface the diagnostics and retry once the content has
    /// changed.
    Rejected(Vec<Diagnostic>),
}

/// Format a whole document.
///
/// Formatting is safe to apply only when the document parses cleanly; any
/// error diagnostic downgrades the request to validate-only.
pub fn format_document(source: &str) -> FormatOutcome {
    format_range(source, None)
}

/// Format a sub-span of the document (whole document when `range` is
/// `None`). Returned edit spans are relative to the full source.
pub fn format_range(source: &str, range: Option<(usize, usize)>) -> FormatOutcome {
    let (start, slice) = match range {
        Some((start, end)) => {
            let end = end.min(source.len());
            let start = start.min(end);
            (start, &source[start..end])
        }
        None => (0, source),
    };

    let doc = blk_lang::parse(slice);
    if !doc.is_clean() {
        tracing::debug!(
            errors = doc.diagnostics.len(),
            "refusing to format document with parse errors"
        );
        return FormatOutcome::Rejected(doc.diagnostics);
    }

    let canonical = canonical_text(&doc.root);
    let mut edits = minimal_edits(slice, &canonical);
    if start > 0 {
        for edit in &mut edits {
            edit.span.start += start;
            edit.span.end += start;
        }
    }
    FormatOutcome::Edits(edits)
}

/// Compute the minimal line-level replacements turning `old` into `new`.
pub fn minimal_edits(old: &str, new: &str) -> Vec<TextEdit> {
    if old == new {
        return Vec::new();
    }

    let index = LineIndex::new(old);
    let old_offsets = line_token_offsets(old);
    let new_lines: Vec<&str> = new.split_inclusive('\n').collect();

    let diff = TextDiff::from_lines(old, new);
    let mut edits = Vec::new();
    for op in diff.ops() {
        let (old_range, new_range) = match *op {
            DiffOp::Equal { .. } => continue,
            DiffOp::Delete {
                old_index, old_len, ..
            } => (old_index..old_index + old_len, 0..0),
            DiffOp::Insert {
                old_index,
                new_index,
                new_len,
            } => (old_index..old_index, new_index..new_index + new_len),
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => (old_index..old_index + old_len, new_index..new_index + new_len),
        };
        let start = old_offsets[old_range.start];
        let end = old_offsets[old_range.end];
        let replacement: String = new_lines[new_range].concat();
        edits.push(TextEdit {
            span: index.span_at(start, end),
            replacement,
        });
    }
    edits
}

/// Apply edits (ordered, non-overlapping) to the original text.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> String {
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in edits {
        out.push_str(&source[cursor..edit.span.start]);
        out.push_str(&edit.replacement);
        cursor = edit.span.end;
    }
    out.push_str(&source[cursor..]);
    out
}

/// Byte offset of each line token plus a final sentinel at `s.len()`.
fn line_token_offsets(s: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    let mut pos = 0;
    for line in s.split_inclusive('\n') {
        pos += line.len();
        offsets.push(pos);
    }
    if offsets.len() == 1 {
        offsets.push(s.len());
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn canonical_text_produces_zero_edits() {
        let source = "a { x:i = 1; }\n";
        match format_document(source) {
            FormatOutcome::Edits(edits) => assert_eq!(edits, vec![]),
            FormatOutcome::Rejected(d) => panic!("unexpected rejection: {d:?}"),
        }
    }

    #[test]
    fn applying_edits_yields_canonical_text() {
        let source = "a{\nx:i=1;y:i=2\n}\nb{}\n";
        let FormatOutcome::Edits(edits) = format_document(source) else {
            panic!("expected edits");
        };
        let applied = apply_edits(source, &edits);
        assert_eq!(applied, "a {\n  x:i = 1; y:i = 2;\n}\nb {}\n");
        // a second pass is a fixed point
        let FormatOutcome::Edits(second) = format_document(&applied) else {
            panic!("expected edits");
        };
        assert_eq!(second, vec![]);
    }

    #[test]
    fn edits_touch_only_changed_lines() {
        let source = "a {\n  x:i = 1\n  y:i=2\n}\n";
        let FormatOutcome::Edits(edits) = format_document(source) else {
            panic!("expected edits");
        };
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].span.line, 3);
        assert_eq!(edits[0].replacement, "  y:i = 2\n");
    }

    #[test]
    fn parse_errors_reject_formatting() {
        let source = "a {\n  x:i = oops\n}\n";
        match format_document(source) {
            FormatOutcome::Rejected(diagnostics) => {
                assert_eq!(diagnostics.len(), 1);
            }
            FormatOutcome::Edits(_) => panic!("must not edit an unparsable document"),
        }
    }

    #[test]
    fn unmatched_brace_rejects_formatting() {
        let source = "a {\n  x:i = 1\n";
        assert!(matches!(
            format_document(source),
            FormatOutcome::Rejected(_)
        ));
    }

    #[test]
    fn range_formatting_offsets_edit_spans() {
        let prefix = "junk not touched\n";
        let body = "a{x:i=1}\n";
        let source = format!("{prefix}{body}");
        let outcome = format_range(&source, Some((prefix.len(), source.len())));
        let FormatOutcome::Edits(edits) = outcome else {
            panic!("expected edits");
        };
        assert!(!edits.is_empty());
        assert!(edits.iter().all(|e| e.span.start >= prefix.len()));
    }

    #[test]
    fn minimal_edits_roundtrip_arbitrary_texts() {
        let cases = [
            ("", "a\n"),
            ("a\n", ""),
            ("a\nb\nc\n", "a\nB\nc\n"),
            ("one\ntwo", "one\ntwo\nthree\n"),
        ];
        for (old, new) in cases {
            let edits = minimal_edits(old, new);
            assert_eq!(apply_edits(old, &edits), new, "case {old:?} -> {new:?}");
        }
    }
}

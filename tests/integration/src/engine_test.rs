//! End-to-end test of the language engine: parse -> format -> reparse.
//!
//! Exercises the text -> tree -> text contract on a document that uses every
//! construct together: nested blocks, one-line blocks, typed params,
//! includes, comments and blank runs.

use blk_format::{FormatOutcome, apply_edits, canonical_text, format_document};
use blk_lang::{ParseErrorKind, parse};
use pretty_assertions::assert_eq;

const FIXTURE: &str = r##"// mission setup
mission{
  name:t = "assault"

  weather{wind:p2=3, 4;rain:b=off}


  spawn {
    pos:p3 = 10,  20, 30
    @force:b = yes
  }
  include "#levels/base.blk"
}
"##;

#[test]
fn full_document_formats_and_round_trips() {
    let doc = parse(FIXTURE);
    assert!(doc.is_clean(), "fixture must parse: {:?}", doc.diagnostics);

    let FormatOutcome::Edits(edits) = format_document(FIXTURE) else {
        panic!("clean fixture must produce edits");
    };
    let formatted = apply_edits(FIXTURE, &edits);

    let expected = r##"// mission setup
mission {
  name:t = "assault"

  weather { wind:p2 = 3, 4; rain:b = off; }

  spawn {
    pos:p3 = 10,  20, 30
    "@force":b = yes
  }
  include "#levels/base.blk"
}
"##;
    assert_eq!(formatted, expected);

    // formatting changes layout only, never semantic content
    let reparsed = parse(&formatted);
    assert!(reparsed.is_clean());
    assert!(doc.same_structure(&reparsed));

    // and the canonical form is a fixed point
    let FormatOutcome::Edits(second) = format_document(&formatted) else {
        panic!("canonical text must not be rejected");
    };
    assert_eq!(second, vec![]);
}

#[test]
fn canonical_text_equals_applied_edits() {
    let doc = parse(FIXTURE);
    let FormatOutcome::Edits(edits) = format_document(FIXTURE) else {
        panic!("expected edits");
    };
    assert_eq!(apply_edits(FIXTURE, &edits), canonical_text(&doc.root));
}

#[test]
fn broken_document_is_diagnosed_but_still_yields_a_tree() {
    let source = "mission {\n  name:q = 1\n  junk junk junk\n  spawn {\n    x:i = 1\n";
    let doc = parse(source);

    let kinds: Vec<ParseErrorKind> = doc.diagnostics.iter().map(|d| d.kind).collect();
    assert!(kinds.contains(&ParseErrorKind::UnknownParamType));
    assert!(kinds.contains(&ParseErrorKind::UnknownToken));
    assert!(kinds.contains(&ParseErrorKind::UnmatchedBrace));

    // deepest reachable tree is still built
    let mission = &doc.root.blocks[0];
    assert_eq!(mission.name, "mission");
    assert_eq!(mission.blocks[0].name, "spawn");
    assert_eq!(mission.blocks[0].params[0].name, "x");

    // and formatting refuses to touch it
    assert!(matches!(
        format_document(source),
        FormatOutcome::Rejected(_)
    ));
}

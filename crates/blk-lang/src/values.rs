//! Typed value grammar
//!
//! A fixed table maps each parameter type tag to the shape its value must
//! have. The value must match the shape in full, not as a prefix.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Shape rules per type tag. Checked by finding the first match and
/// requiring it to cover the whole trimmed value.
static VALUE_CHECKERS: LazyLock<HashMap<&'static str, Regex>> = LazyLock::new(|| {
    let real = r"[-\d.]+";
    let int = r"[-\d]+";
    let triple = format!(r"\[{real}, {real}, {real}\]");
    [
        ("t", r#"['"](?:.*?)['"]"#.to_string()),
        ("i", int.to_string()),
        ("i64", int.to_string()),
        ("r", real.to_string()),
        ("p2", format!(r"{real},(?:\s*){real}")),
        ("p3", format!(r"{real},(?:\s*){real},(?:\s*){real}")),
        (
            "p4",
            format!(r"{real},(?:\s*){real},(?:\s*){real},(?:\s*){real}"),
        ),
        ("ip2", format!(r"{int},(?:\s*){int}")),
        ("ip3", format!(r"{int},(?:\s*){int},(?:\s*){int}")),
        (
            "ip4",
            format!(r"{int},(?:\s*){int},(?:\s*){int},(?:\s*){int}"),
        ),
        (
            "b",
            r"\btrue\b|\bfalse\b|\byes\b|\bno\b|\bon\b|\boff\b".to_string(),
        ),
        (
            "c",
            format!(r"{int},(?:\s*){int},(?:\s*){int}(?:,(?:\s*){int})?"),
        ),
        ("m", format!(r"\[{triple} {triple} {triple} {triple}\]")),
    ]
    .into_iter()
    .map(|(tag, pattern)| {
        let re = Regex::new(&pattern).expect("value checker pattern");
        (tag, re)
    })
    .collect()
});

/// A value that failed its tag's shape check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("Unknown parameter type: {0}")]
    UnknownType(String),

    #[error("Wrong value[{tag}] = {value}")]
    Mismatch { tag: String, value: String },
}

/// Validate a trimmed value against its type tag's shape rule.
pub fn validate_value(tag: &str, value: &str) -> Result<(), ValueError> {
    let Some(checker) = VALUE_CHECKERS.get(tag) else {
        return Err(ValueError::UnknownType(tag.to_string()));
    };
    match checker.find(value) {
        Some(m) if m.len() == value.len() => Ok(()),
        _ => Err(ValueError::Mismatch {
            tag: tag.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("t", "\"hello\"")]
    #[case("t", "'hello'")]
    #[case("i", "5")]
    #[case("i", "-12")]
    #[case("i64", "9000000000")]
    #[case("r", "5.0")]
    #[case("r", "-0.25")]
    #[case("r", "7")]
    #[case("p2", "1, 2")]
    #[case("p2", "1,2")]
    #[case("p3", "1, 2, 3")]
    #[case("p4", "1, 2, 3, 4")]
    #[case("ip2", "1, 2")]
    #[case("ip3", "-1, 0, 1")]
    #[case("ip4", "1, 2, 3, 4")]
    #[case("b", "true")]
    #[case("b", "off")]
    #[case("b", "yes")]
    #[case("c", "255, 255, 255")]
    #[case("c", "255, 255, 255, 128")]
    #[case("m", "[[1, 0, 0] [0, 1, 0] [0, 0, 1] [0, 0, 0]]")]
    fn accepts_valid_values(#[case] tag: &str, #[case] value: &str) {
        assert_eq!(validate_value(tag, value), Ok(()));
    }

    #[rstest]
    #[case("i", "5.0")]
    #[case("i", "five")]
    #[case("r", "1.0f")]
    #[case("p2", "1")]
    #[case("p3", "1, 2")]
    #[case("p3", "1, 2, 3, 4")]
    #[case("ip2", "1.5, 2")]
    #[case("b", "maybe")]
    #[case("b", "truex")]
    #[case("c", "255, 255")]
    #[case("t", "unquoted")]
    #[case("m", "[[1, 0, 0] [0, 1, 0] [0, 0, 1]]")]
    fn rejects_malformed_values(#[case] tag: &str, #[case] value: &str) {
        assert!(matches!(
            validate_value(tag, value),
            Err(ValueError::Mismatch { .. })
        ));
    }

    #[test]
    fn unknown_tag_is_reported_as_such() {
        assert_eq!(
            validate_value("q", "5"),
            Err(ValueError::UnknownType("q".to_string()))
        );
    }
}

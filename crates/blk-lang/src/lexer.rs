//! Tokenizer
//!
//! A fixed, statically-constructed ordered list of token matchers is tried
//! at the current offset. Every matcher anchors at the start of the
//! remaining input and captures leading whitespace (which may span
//! newlines) as the token's indent. Unrecognized content is diagnosed once
//! per line and skipped one character at a time, so a malformed span never
//! hides the rest of the document.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::diagnostics::{Diagnostic, ParseErrorKind};
use crate::span::LineIndex;
use crate::values::{ValueError, validate_value};

static BLOCK_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\s*)([\w@\-": \[\]]+)(\s*)\{"#).expect("block-open regex")
});

static BLOCK_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)\}").expect("block-close regex"));

static PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\s*)([\w@\-": \[\]]+):([\w ]+)(\s*=\s*)([^;}\r\n\t]+);?"#)
        .expect("param regex")
});

static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\s*)include(?:\s*)["']([^'"]+)["']"#).expect("include regex")
});

static LINE_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)//([^\r\n]*)").expect("line-comment regex"));

static BLOCK_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)/\*((?s:.*?))\*/").expect("block-comment regex"));

/// One lexical token.
///
/// `start` is the byte offset of the token's content (after its leading
/// whitespace run); `end` is the offset one past the consumed text.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    BlockOpen {
        name: String,
        start: usize,
        end: usize,
    },
    BlockClose {
        start: usize,
        end: usize,
    },
    Param {
        name: String,
        type_tag: String,
        value: String,
        start: usize,
        end: usize,
    },
    Include {
        path: String,
        start: usize,
        end: usize,
    },
    Comment {
        text: String,
        block_style: bool,
        start: usize,
        end: usize,
    },
}

impl Token {
    pub fn start(&self) -> usize {
        match self {
            Token::BlockOpen { start, .. }
            | Token::BlockClose { start, .. }
            | Token::Param { start, .. }
            | Token::Include { start, .. }
            | Token::Comment { start, .. } => *start,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            Token::BlockOpen { end, .. }
            | Token::BlockClose { end, .. }
            | Token::Param { end, .. }
            | Token::Include { end, .. }
            | Token::Comment { end, .. } => *end,
        }
    }
}

enum Lexed {
    /// A token was produced.
    Token(Token),
    /// An erroneous span was diagnosed and consumed; keep scanning.
    Skip,
    /// No production matched at the current offset.
    NoMatch,
}

/// Streaming tokenizer over a source string.
pub struct Scanner<'a> {
    source: &'a str,
    offset: usize,
    line_index: LineIndex,
    lines_with_error: HashSet<u32>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            line_index: LineIndex::new(source),
            lines_with_error: HashSet::new(),
        }
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Emit a diagnostic covering the given line, unless that line has
    /// already been blamed.
    pub fn report(
        &mut self,
        diagnostics: &mut Vec<Diagnostic>,
        line: u32,
        kind: ParseErrorKind,
        message: impl Into<String>,
    ) {
        if self.lines_with_error.insert(line) {
            diagnostics.push(Diagnostic::error(
                self.line_index.line_span(line),
                kind,
                message,
            ));
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    /// Produce the next token, diagnosing and skipping anything that does
    /// not match a production. Returns `None` at end of input.
    pub fn next_token(&mut self, diagnostics: &mut Vec<Diagnostic>) -> Option<Token> {
        loop {
            if self.offset >= self.source.len() {
                return None;
            }
            match self.lex_one(diagnostics) {
                Lexed::Token(token) => return Some(token),
                Lexed::Skip => continue,
                Lexed::NoMatch => {
                    let rest = self.rest();
                    let Some(rel) = rest.find(|c: char| !c.is_whitespace()) else {
                        self.offset = self.source.len();
                        return None;
                    };
                    let line = self.line_index.line_of(self.offset + rel);
                    self.report(diagnostics, line, ParseErrorKind::UnknownToken, "Unknown token");
                    // resynchronize: skip the blamed character and retry
                    let ch = rest[rel..].chars().next().expect("non-empty rest");
                    self.offset += rel + ch.len_utf8();
                }
            }
        }
    }

    fn lex_one(&mut self, diagnostics: &mut Vec<Diagnostic>) -> Lexed {
        let rest = self.rest();

        if let Some(c) = BLOCK_OPEN_RE.captures(rest) {
            let indent_len = c[1].len();
            let name = c[2].trim_end_matches(' ').to_string();
            let token = Token::BlockOpen {
                name,
                start: self.offset + indent_len,
                end: self.offset + c[0].len(),
            };
            self.offset += c[0].len();
            return Lexed::Token(token);
        }

        if let Some(c) = BLOCK_CLOSE_RE.captures(rest) {
            let token = Token::BlockClose {
                start: self.offset + c[1].len(),
                end: self.offset + c[0].len(),
            };
            self.offset += c[0].len();
            return Lexed::Token(token);
        }

        if let Some(c) = PARAM_RE.captures(rest) {
            return self.lex_param(&c, diagnostics);
        }

        if let Some(c) = INCLUDE_RE.captures(rest) {
            let token = Token::Include {
                path: c[2].to_string(),
                start: self.offset + c[1].len(),
                end: self.offset + c[0].len(),
            };
            self.offset += c[0].len();
            return Lexed::Token(token);
        }

        if let Some(c) = LINE_COMMENT_RE.captures(rest) {
            let token = Token::Comment {
                text: c[2].to_string(),
                block_style: false,
                start: self.offset + c[1].len(),
                end: self.offset + c[0].len(),
            };
            self.offset += c[0].len();
            return Lexed::Token(token);
        }

        if let Some(c) = BLOCK_COMMENT_RE.captures(rest) {
            let token = Token::Comment {
                text: c[2].to_string(),
                block_style: true,
                start: self.offset + c[1].len(),
                end: self.offset + c[0].len(),
            };
            self.offset += c[0].len();
            return Lexed::Token(token);
        }

        Lexed::NoMatch
    }

    fn lex_param(&mut self, c: &regex::Captures<'_>, diagnostics: &mut Vec<Diagnostic>) -> Lexed {
        let indent_len = c[1].len();
        let value_rel = c.get(5).expect("param value group").start();
        let mut consumed = c[0].len();
        let mut value = c.get(5).expect("param value group").as_str();

        // Strip an inline comment trailing the value; the comment itself is
        // lexed as its own token on the next pass.
        let comment_cut = match (value.find("/*"), value.find("//")) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        if let Some(cut) = comment_cut {
            value = &value[..cut];
            consumed = value_rel + value.len();
        }

        // Trailing whitespace between the value and its terminator is not
        // part of the value.
        let trimmed = value.trim_end_matches([' ', '\t']);
        if trimmed.len() != value.len() {
            if comment_cut.is_some() {
                consumed = value_rel + trimmed.len();
            }
            value = trimmed;
        }

        let type_tag: String = c[3].chars().filter(|ch| !ch.is_whitespace()).collect();

        if let Err(err) = validate_value(&type_tag, value) {
            let kind = match err {
                ValueError::UnknownType(_) => ParseErrorKind::UnknownParamType,
                ValueError::Mismatch { .. } => ParseErrorKind::InvalidParamValue,
            };
            let line = self.line_index.line_of(self.offset + indent_len);
            tracing::debug!(line, %err, "skipping malformed param");
            self.report(diagnostics, line, kind, err.to_string());
            self.offset += consumed;
            return Lexed::Skip;
        }

        let token = Token::Param {
            name: c[2].trim_end_matches(' ').to_string(),
            type_tag,
            value: value.to_string(),
            start: self.offset + indent_len,
            end: self.offset + consumed,
        };
        self.offset += consumed;
        Lexed::Token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut scanner = Scanner::new(source);
        let mut diagnostics = Vec::new();
        let mut tokens = Vec::new();
        while let Some(token) = scanner.next_token(&mut diagnostics) {
            tokens.push(token);
        }
        (tokens, diagnostics)
    }

    #[test]
    fn lexes_block_param_and_close() {
        let (tokens, diagnostics) = lex("entity {\n  hp:i = 100;\n}\n");
        assert!(diagnostics.is_empty());
        assert!(matches!(&tokens[0], Token::BlockOpen { name, .. } if name == "entity"));
        assert!(matches!(
            &tokens[1],
            Token::Param { name, type_tag, value, .. }
                if name == "hp" && type_tag == "i" && value == "100"
        ));
        assert!(matches!(&tokens[2], Token::BlockClose { .. }));
    }

    #[test]
    fn lexes_include_and_comments() {
        let (tokens, diagnostics) = lex("include \"#base/common.blk\"\n// note\n/* multi\nline */\n");
        assert!(diagnostics.is_empty());
        assert!(matches!(&tokens[0], Token::Include { path, .. } if path == "#base/common.blk"));
        assert!(matches!(
            &tokens[1],
            Token::Comment { text, block_style: false, .. } if text == " note"
        ));
        assert!(matches!(
            &tokens[2],
            Token::Comment { text, block_style: true, .. } if text == " multi\nline "
        ));
    }

    #[test]
    fn strips_inline_comment_from_param_value() {
        let (tokens, diagnostics) = lex("x:i = 1 // speed\n");
        assert!(diagnostics.is_empty());
        assert!(matches!(
            &tokens[0],
            Token::Param { value, .. } if value == "1"
        ));
        // the comment is lexed separately
        assert!(matches!(&tokens[1], Token::Comment { text, .. } if text == " speed"));
    }

    #[test]
    fn bad_value_yields_diagnostic_and_no_token() {
        let (tokens, diagnostics) = lex("x:i = 5.0\n");
        assert!(tokens.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, ParseErrorKind::InvalidParamValue);
        assert_eq!(diagnostics[0].message, "Wrong value[i] = 5.0");
    }

    #[test]
    fn unknown_tag_yields_diagnostic() {
        let (_, diagnostics) = lex("x:q = 5\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, ParseErrorKind::UnknownParamType);
    }

    #[test]
    fn garbage_is_blamed_once_per_line() {
        let (tokens, diagnostics) = lex("$$$ ???\nentity {}\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, ParseErrorKind::UnknownToken);
        assert_eq!(diagnostics[0].span.line, 1);
        // the rest of the document still lexes
        assert!(matches!(&tokens[0], Token::BlockOpen { name, .. } if name == "entity"));
    }

    #[test]
    fn whitespace_inside_type_tag_is_stripped() {
        let (tokens, diagnostics) = lex("x: i = 5\n");
        assert!(diagnostics.is_empty());
        assert!(matches!(
            &tokens[0],
            Token::Param { type_tag, .. } if type_tag == "i"
        ));
    }

    #[test]
    fn spans_cover_token_content() {
        let source = "  hp:i = 1;\n";
        let (tokens, _) = lex(source);
        let Token::Param { start, end, .. } = &tokens[0] else {
            panic!("expected param");
        };
        assert_eq!(&source[*start..*end], "hp:i = 1;");
    }
}

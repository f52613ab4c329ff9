//! Tree construction
//!
//! Consumes the token stream into a [`Document`]. Structural errors are
//! recovered: a stray `}` is diagnosed and dropped, and blocks left open at
//! end of input are closed so the deepest reachable tree is still returned.

use crate::diagnostics::{Diagnostic, ParseErrorKind};
use crate::lexer::{Scanner, Token};
use crate::span::Span;
use crate::tree::{BlankRun, Block, Comment, Document, Include, Param};

/// Parse BLK text into a document. Never fails; syntax errors are collected
/// as diagnostics on the returned document.
pub fn parse(source: &str) -> Document {
    Parser::new(source).run()
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    diagnostics: Vec<Diagnostic>,
    /// `blank[i]` is true when 1-based line `i + 1` is empty or
    /// whitespace-only.
    blank: Vec<bool>,
    source_len: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        let scanner = Scanner::new(source);
        let blank = (1..=scanner.line_index().line_count())
            .map(|line| {
                let (start, end) = scanner.line_index().line_range(line);
                source[start..end].trim().is_empty()
            })
            .collect();
        Self {
            scanner,
            diagnostics: Vec::new(),
            blank,
            source_len: source.len(),
        }
    }

    fn run(mut self) -> Document {
        let mut stack: Vec<Block> = vec![Block::root()];
        let mut prev_end = 0usize;

        while let Some(token) = self.scanner.next_token(&mut self.diagnostics) {
            let top = stack.last_mut().expect("root block on stack");
            self.collect_blank_runs(prev_end, Some(token.start()), top);
            prev_end = token.end();

            match token {
                Token::BlockOpen { name, start, end } => {
                    let span = self.scanner.line_index().span_at(start, end);
                    stack.push(Block::named(name, span));
                }
                Token::BlockClose { start, end } => {
                    if stack.len() > 1 {
                        let mut block = stack.pop().expect("open block");
                        block.span.end = end;
                        stack
                            .last_mut()
                            .expect("parent block")
                            .blocks
                            .push(block);
                    } else {
                        let line = self.scanner.line_index().line_of(start);
                        self.scanner.report(
                            &mut self.diagnostics,
                            line,
                            ParseErrorKind::UnmatchedBrace,
                            "Missed {",
                        );
                    }
                }
                Token::Param {
                    name,
                    type_tag,
                    value,
                    start,
                    end,
                } => {
                    let span = self.scanner.line_index().span_at(start, end);
                    stack.last_mut().expect("open block").params.push(Param {
                        name,
                        type_tag,
                        value,
                        span,
                    });
                }
                Token::Include { path, start, end } => {
                    let span = self.scanner.line_index().span_at(start, end);
                    stack
                        .last_mut()
                        .expect("open block")
                        .includes
                        .push(Include {
                            raw_path: path,
                            span,
                        });
                }
                Token::Comment {
                    text,
                    block_style,
                    start,
                    end,
                } => {
                    let span = self.scanner.line_index().span_at(start, end);
                    stack
                        .last_mut()
                        .expect("open block")
                        .comments
                        .push(Comment {
                            text,
                            is_block_style: block_style,
                            span,
                        });
                }
            }
        }

        // trailing blank lines belong to whatever block is still open
        let top = stack.last_mut().expect("root block on stack");
        self.collect_blank_runs(prev_end, None, top);

        if stack.len() > 1 {
            let line = self.scanner.line_index().line_count();
            self.scanner.report(
                &mut self.diagnostics,
                line,
                ParseErrorKind::UnmatchedBrace,
                "Missed }",
            );
            while stack.len() > 1 {
                let mut block = stack.pop().expect("open block");
                block.span.end = self.source_len;
                stack.last_mut().expect("parent block").blocks.push(block);
            }
        }

        let mut root = stack.pop().expect("root block");
        root.span = Span::new(0, self.source_len, 1, 1);
        Document {
            root,
            diagnostics: self.diagnostics,
            source_len: self.source_len,
        }
    }

    /// Record maximal runs of blank lines lying strictly between the
    /// previous token and `next_start` (or end of input).
    fn collect_blank_runs(&self, prev_end: usize, next_start: Option<usize>, block: &mut Block) {
        let index = self.scanner.line_index();
        let first = if prev_end == 0 {
            1
        } else {
            index.line_of(prev_end) + 1
        };
        let last = match next_start {
            Some(start) => {
                let line = index.line_of(start);
                if line <= first {
                    return;
                }
                line - 1
            }
            None => index.line_count(),
        };

        let mut run_start: Option<u32> = None;
        for line in first..=last {
            let is_blank = self
                .blank
                .get(line as usize - 1)
                .copied()
                .unwrap_or(false);
            match (is_blank, run_start) {
                (true, None) => run_start = Some(line),
                (false, Some(start)) => {
                    block.blank_runs.push(self.blank_run(start, line - 1));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            block.blank_runs.push(self.blank_run(start, last));
        }
    }

    fn blank_run(&self, first: u32, last: u32) -> BlankRun {
        let index = self.scanner.line_index();
        let (start, _) = index.line_range(first);
        let (_, end) = index.line_range(last);
        BlankRun {
            line: first,
            line_count: last - first + 1,
            span: Span::new(start, end, first, 1),
        }
    }
}

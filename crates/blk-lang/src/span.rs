//! Source locations

use serde::Serialize;

/// A half-open byte range in the source text, with the 1-based line and
/// column of its start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Byte offsets of every line start, for offset -> line/column mapping.
#[derive(Clone, Debug)]
pub struct LineIndex {
    /// `starts[i]` is the byte offset of 1-based line `i + 1`.
    starts: Vec<usize>,
    source_len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        Self {
            starts,
            source_len: source.len(),
        }
    }

    pub fn line_count(&self) -> u32 {
        self.starts.len() as u32
    }

    /// 1-based line containing the byte offset.
    pub fn line_of(&self, offset: usize) -> u32 {
        match self.starts.binary_search(&offset) {
            Ok(idx) => idx as u32 + 1,
            Err(idx) => idx as u32,
        }
    }

    /// 1-based (line, column) of the byte offset.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let line = self.line_of(offset);
        let col = offset - self.starts[line as usize - 1] + 1;
        (line, col as u32)
    }

    /// Byte range of a 1-based line, excluding the trailing newline.
    pub fn line_range(&self, line: u32) -> (usize, usize) {
        let idx = (line as usize - 1).min(self.starts.len() - 1);
        let start = self.starts[idx];
        let end = self
            .starts
            .get(idx + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source_len);
        (start, end)
    }

    /// A span covering a whole 1-based line.
    pub fn line_span(&self, line: u32) -> Span {
        let (start, end) = self.line_range(line);
        Span::new(start, end, line, 1)
    }

    /// A span starting at the byte offset.
    pub fn span_at(&self, start: usize, end: usize) -> Span {
        let (line, column) = self.line_col(start);
        Span::new(start, end, line, column)
    }
}

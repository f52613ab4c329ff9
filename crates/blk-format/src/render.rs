//! Canonical rendering
//!
//! Children are bucketed by their original source line and each bucket is
//! emitted as one logical row, in ascending line order. This preserves
//! author-intended grouping of entries declared on one physical line while
//! still re-indenting everything.

use std::collections::BTreeMap;

use blk_lang::tree::{Block, Comment, Include, Param};

const INDENT_WIDTH: usize = 2;

/// Rendering mode of a block, computed from its own children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockClass {
    /// The implicit document root: children at depth 0, no name or braces.
    Root,
    /// No params, sub-blocks, includes or comments: `name {}`.
    Empty,
    /// Only params, and the first one sits on the block's opening line:
    /// `name { p1; p2; }`.
    OneLine,
    /// Everything else: one child row per line, braces on their own lines.
    MultiLine,
}

/// Classify a block for rendering.
pub fn classify(block: &Block) -> BlockClass {
    if block.is_root() {
        BlockClass::Root
    } else if block.has_empty_body() {
        BlockClass::Empty
    } else if block.blocks.is_empty()
        && block.includes.is_empty()
        && block.comments.is_empty()
        && !block.params.is_empty()
        && block.span.line == block.params[0].span.line
    {
        BlockClass::OneLine
    } else {
        BlockClass::MultiLine
    }
}

/// Render the canonical form of a document tree rooted at `root`.
pub fn canonical_text(root: &Block) -> String {
    let rows = layout_rows(root);
    if rows.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for row in &rows {
        out.push_str(&render_row(row, 0));
        out.push('\n');
    }
    out
}

enum Entry<'a> {
    Param(&'a Param),
    Block(&'a Block),
    Include(&'a Include),
    Comment(&'a Comment),
}

impl Entry<'_> {
    fn start(&self) -> usize {
        match self {
            Entry::Param(p) => p.span.start,
            Entry::Block(b) => b.span.start,
            Entry::Include(i) => i.span.start,
            Entry::Comment(c) => c.span.start,
        }
    }
}

enum Row<'a> {
    Blank,
    Entries(Vec<Entry<'a>>),
}

/// Bucket a block's children by original source line; ascending line order.
/// Interior blank runs survive as single blank rows; runs touching either
/// brace are dropped.
fn layout_rows(block: &Block) -> Vec<Row<'_>> {
    let mut map: BTreeMap<u32, Vec<Entry<'_>>> = BTreeMap::new();
    for p in &block.params {
        map.entry(p.span.line).or_default().push(Entry::Param(p));
    }
    for b in &block.blocks {
        map.entry(b.span.line).or_default().push(Entry::Block(b));
    }
    for i in &block.includes {
        map.entry(i.span.line).or_default().push(Entry::Include(i));
    }
    for c in &block.comments {
        map.entry(c.span.line).or_default().push(Entry::Comment(c));
    }
    for bucket in map.values_mut() {
        bucket.sort_by_key(Entry::start);
    }

    if let (Some(&first), Some(&last)) = (map.keys().next(), map.keys().next_back()) {
        for run in &block.blank_runs {
            let run_last = run.line + run.line_count - 1;
            if run.line > first && run_last < last {
                map.insert(run.line, Vec::new());
            }
        }
    }

    map.into_values()
        .map(|bucket| {
            if bucket.is_empty() {
                Row::Blank
            } else {
                Row::Entries(bucket)
            }
        })
        .collect()
}

/// Render one logical row at the given indent depth.
fn render_row(row: &Row<'_>, depth: usize) -> String {
    let Row::Entries(entries) = row else {
        return String::new();
    };
    let indent = " ".repeat(depth * INDENT_WIDTH);
    let content_count = entries
        .iter()
        .filter(|e| !matches!(e, Entry::Comment(_)))
        .count();
    let terminate_params = content_count > 1;

    let mut out = indent;
    let mut first = true;
    for entry in entries {
        if !first {
            out.push(' ');
        }
        first = false;
        match entry {
            Entry::Param(p) => out.push_str(&display_param(p, terminate_params)),
            Entry::Block(b) => out.push_str(&render_block(b, depth + 1)),
            Entry::Include(i) => out.push_str(&format!("include \"{}\"", i.raw_path)),
            Entry::Comment(c) => out.push_str(&display_comment(c)),
        }
    }
    out
}

/// Render a named block; `child_depth` is the indent depth of its children,
/// the closing brace dedents one level.
fn render_block(block: &Block, child_depth: usize) -> String {
    match classify(block) {
        BlockClass::Root | BlockClass::Empty => {
            // a root block never reaches here; see canonical_text
            format!("{} {{}}", display_name(&block.name))
        }
        BlockClass::OneLine => {
            let body: Vec<String> = block
                .params
                .iter()
                .map(|p| display_param(p, true))
                .collect();
            format!("{} {{ {} }}", display_name(&block.name), body.join(" "))
        }
        BlockClass::MultiLine => {
            let mut out = format!("{} {{\n", display_name(&block.name));
            for row in &layout_rows(block) {
                out.push_str(&render_row(row, child_depth));
                out.push('\n');
            }
            out.push_str(&" ".repeat(child_depth.saturating_sub(1) * INDENT_WIDTH));
            out.push('}');
            out
        }
    }
}

/// Block and param names beginning with `@` are quoted on output.
fn display_name(name: &str) -> String {
    if name.starts_with('@') {
        format!("\"{name}\"")
    } else {
        name.to_string()
    }
}

fn display_param(p: &Param, terminate: bool) -> String {
    let value = if p.type_tag == "t" && !p.value.starts_with(['\'', '"']) {
        format!("\"{}\"", p.value)
    } else {
        p.value.clone()
    };
    format!(
        "{}:{} = {}{}",
        display_name(&p.name),
        p.type_tag,
        value,
        if terminate { ";" } else { "" }
    )
}

fn display_comment(c: &Comment) -> String {
    if c.is_block_style {
        let body: Vec<&str> = c.text.split('\n').map(str::trim_end).collect();
        format!("/*{}*/", body.join("\n"))
    } else {
        format!("//{}", c.text.trim_end())
    }
}

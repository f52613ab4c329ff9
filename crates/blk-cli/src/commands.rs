//! Command implementations

use std::path::Path;

use colored::Colorize;
use serde_json::json;

use blk_deps::{DepNode, DepTreeBuilder, ResolverConfig};
use blk_format::{FormatOutcome, apply_edits, format_document};
use blk_lang::{Diagnostic, Severity, parse_validator_output};

use crate::error::{Error, Result};

/// Default resolver config file probed when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "blktool.toml";

pub fn check(file: &Path, validator_log: Option<&Path>, json: bool) -> Result<()> {
    let source = blk_fs::read_file(file)?;
    let doc = blk_lang::parse(&source);

    let external = match validator_log {
        Some(log) => parse_validator_output(&blk_fs::read_file(log)?),
        None => Vec::new(),
    };

    if json {
        let payload = json!({
            "file": file.display().to_string(),
            "diagnostics": doc.diagnostics,
            "external": external,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        for diagnostic in &doc.diagnostics {
            print_diagnostic(file, diagnostic);
        }
        for diagnostic in &external {
            println!(
                "{}:{}: {} {}",
                diagnostic.file,
                diagnostic.line,
                "error".red().bold(),
                diagnostic.message
            );
        }
    }

    let count = doc
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count()
        + external.len();
    if count > 0 {
        return Err(Error::ChecksFailed {
            path: file.to_path_buf(),
            count,
        });
    }

    if !json {
        println!("{} {}", "ok".green().bold(), file.display());
    }
    Ok(())
}

pub fn format(file: &Path, write: bool, check: bool) -> Result<()> {
    let source = blk_fs::read_file(file)?;

    let edits = match format_document(&source) {
        FormatOutcome::Rejected(diagnostics) => {
            for diagnostic in &diagnostics {
                print_diagnostic(file, diagnostic);
            }
            return Err(Error::FormatRejected {
                path: file.to_path_buf(),
            });
        }
        FormatOutcome::Edits(edits) => edits,
    };

    if check {
        if edits.is_empty() {
            println!("{} {}", "ok".green().bold(), file.display());
            return Ok(());
        }
        return Err(Error::NotCanonical {
            path: file.to_path_buf(),
        });
    }

    let formatted = apply_edits(&source, &edits);
    if write {
        if !edits.is_empty() {
            std::fs::write(file, &formatted).map_err(|source| Error::Write {
                path: file.to_path_buf(),
                source,
            })?;
            tracing::debug!(edits = edits.len(), "rewrote {}", file.display());
        }
    } else {
        print!("{formatted}");
    }
    Ok(())
}

pub fn deps(file: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = match config_path {
        Some(path) => ResolverConfig::load(path)?,
        None => ResolverConfig::load(DEFAULT_CONFIG_FILE)?,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)?;
    let tree = runtime.block_on(DepTreeBuilder::new(config).build(file));

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{}", render_tree(&tree, 0));
    }
    Ok(())
}

fn print_diagnostic(file: &Path, diagnostic: &Diagnostic) {
    println!(
        "{}:{}: {} {}",
        file.display(),
        diagnostic.span.line,
        "error".red().bold(),
        diagnostic.message
    );
}

fn render_tree(node: &DepNode, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let location = match &node.resolved_path {
        Some(path) => path.clone(),
        None => "<unresolved>".to_string(),
    };
    let mut out = format!("{indent}{} ({location})\n", node.name);
    for child in &node.children {
        out.push_str(&render_tree(child, depth + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn render_tree_indents_children() {
        let tree = DepNode {
            name: "a.blk".to_string(),
            resolved_path: Some("/r/a.blk".to_string()),
            children: vec![DepNode {
                name: "b.blk".to_string(),
                resolved_path: None,
                children: Vec::new(),
            }],
        };
        assert_eq!(
            render_tree(&tree, 0),
            "a.blk (/r/a.blk)\n  b.blk (<unresolved>)\n"
        );
    }

    #[test]
    fn format_rejects_broken_documents() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("bad.blk");
        std::fs::write(&file, "a {\n  x:i = oops\n}\n").unwrap();
        let original = std::fs::read_to_string(&file).unwrap();

        let result = format(&file, true, false);
        assert!(matches!(result, Err(Error::FormatRejected { .. })));
        // refusal must not touch the file
        assert_eq!(std::fs::read_to_string(&file).unwrap(), original);
    }

    #[test]
    fn format_write_canonicalizes_in_place() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("ok.blk");
        std::fs::write(&file, "a{x:i=1;}\n").unwrap();

        format(&file, true, false).unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "a { x:i = 1; }\n");
    }

    #[test]
    fn check_flags_error_diagnostics() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("bad.blk");
        std::fs::write(&file, "x:b = maybe\n").unwrap();

        let result = check(&file, None, false);
        assert!(matches!(
            result,
            Err(Error::ChecksFailed { count: 1, .. })
        ));
    }
}

//! External validator output parsing
//!
//! The engine's own diagnostics may be supplemented by the stdout of an
//! external compiled validator. Its output lines follow two fixed patterns;
//! anything else is ignored. Each distinct line number yields at most one
//! diagnostic, first match wins.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static GENERIC_ERROR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ERR: BLK error '([^']+)',(\d+):\s*(.*)$").expect("validator error regex")
});

static INVALID_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ERR: BLK invalid (\S+) \(type ([^)]+)\) value in line (\d+) of '([^']+)': '(.*)'$")
        .expect("validator invalid-value regex")
});

/// A diagnostic reported by the external validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExternalDiagnostic {
    pub file: String,
    /// 1-based line in the validated file.
    pub line: u32,
    pub message: String,
}

/// Parse the captured stdout of the external validator.
pub fn parse_validator_output(output: &str) -> Vec<ExternalDiagnostic> {
    let mut seen_lines: HashSet<u32> = HashSet::new();
    let mut diagnostics = Vec::new();

    for raw_line in output.lines() {
        let raw_line = raw_line.trim_end_matches('\r');

        let parsed = if let Some(c) = GENERIC_ERROR_RE.captures(raw_line) {
            c[2].parse::<u32>().ok().map(|line| ExternalDiagnostic {
                file: c[1].to_string(),
                line,
                message: c[3].to_string(),
            })
        } else if let Some(c) = INVALID_VALUE_RE.captures(raw_line) {
            c[3].parse::<u32>().ok().map(|line| ExternalDiagnostic {
                file: c[4].to_string(),
                line,
                message: format!("invalid {} (type {}) value: '{}'", &c[1], &c[2], &c[5]),
            })
        } else {
            None
        };

        if let Some(diagnostic) = parsed {
            if seen_lines.insert(diagnostic.line) {
                diagnostics.push(diagnostic);
            }
        }
    }

    diagnostics
}

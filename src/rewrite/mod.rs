// src/rewrite/mod.rs
//! Applies docstring changes to a source buffer.
//!
//! Changes are realized bottom-up so an edit never moves the anchor of an
//! edit still pending above it. The whole batch is built in memory; callers
//! write the result once, or not at all.

pub mod render;
pub mod writer;

pub use self::render::{render_block, RenderOptions};

use crate::error::{DocError, Result};
use crate::lang;
use crate::model::{Change, ChangeKind};
use crate::parser::docstring::{delimiter, split_prefix};
use crate::parser::lines::{indent_of, indent_width, strip_trailing_comment};
use std::collections::HashSet;
use std::path::Path;

/// Source lines without terminators, plus what is needed to write them back
/// byte-for-byte outside the edited regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    pub lines: Vec<String>,
    pub newline: &'static str,
    pub trailing_newline: bool,
}

impl SourceBuffer {
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            newline: if text.contains("\r\n") { "\r\n" } else { "\n" },
            trailing_newline: text.ends_with('\n'),
        }
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join(self.newline);
        if self.trailing_newline && !self.lines.is_empty() {
            text.push_str(self.newline);
        }
        text
    }
}

/// Result of applying a batch.
#[derive(Debug, Clone)]
pub struct Applied {
    pub buffer: SourceBuffer,
    pub warnings: Vec<String>,
}

/// Realizes every change in `changes` against `buffer`.
///
/// Later changes sharing an anchor with an earlier one are dropped with a warning.
///
/// # Errors
/// Returns `RewriteFailure` if any anchor is out of range, does not end a
/// header, or (for `modify`) has no docstring after it. Nothing is applied then.
pub fn apply(buffer: &SourceBuffer, changes: &[Change], options: RenderOptions) -> Result<Applied> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();
    let mut pending: Vec<&Change> = Vec::with_capacity(changes.len());
    for change in changes {
        if seen.insert(change.anchor_line) {
            pending.push(change);
        } else {
            warnings.push(format!(
                "Dropped duplicate change at line {}: {}",
                change.anchor_line, change.description
            ));
        }
    }
    pending.sort_by(|a, b| b.anchor_line.cmp(&a.anchor_line));

    let mut lines = buffer.lines.clone();
    for change in pending {
        apply_one(&mut lines, change, options)?;
        tracing::debug!(anchor = change.anchor_line, kind = %change.kind, "applied change");
    }

    Ok(Applied {
        buffer: SourceBuffer {
            lines,
            ..buffer.clone()
        },
        warnings,
    })
}

fn apply_one(lines: &mut Vec<String>, change: &Change, options: RenderOptions) -> Result<()> {
    let anchor = change.anchor_line;
    if !is_header_end(lines.as_slice(), anchor) {
        return Err(DocError::rewrite(
            &change.target_path,
            format!("line {anchor} does not end a function header"),
        ));
    }

    match change.kind {
        ChangeKind::Add => {
            let indent = body_indent(lines.as_slice(), anchor);
            let block = render_block(&change.new_text, &indent, options);
            lines.splice(anchor..anchor, block);
        }
        ChangeKind::Modify => {
            let (start, end) = find_docstring_span(lines.as_slice(), anchor).ok_or_else(|| {
                DocError::rewrite(
                    &change.target_path,
                    format!("no docstring found after line {anchor}"),
                )
            })?;
            let indent = indent_of(&lines[start]).to_string();
            let block = render_block(&change.new_text, &indent, options);
            lines.splice(start..=end, block);
        }
    }
    Ok(())
}

fn text<S: AsRef<str>>(line: &S) -> &str {
    line.as_ref()
}

/// True when 1-based `anchor` exists and, minus any trailing comment, ends in `:`.
#[must_use]
pub fn is_header_end<S: AsRef<str>>(lines: &[S], anchor: usize) -> bool {
    anchor >= 1
        && lines.get(anchor - 1).is_some_and(|l| {
            strip_trailing_comment(text(l))
                .trim_end()
                .ends_with(':')
        })
}

/// Indentation for a new docstring under the header ending at `anchor`.
///
/// Uses the first body line when it sits deeper than the `def` line,
/// otherwise the `def` indentation plus one unit.
#[must_use]
pub fn body_indent<S: AsRef<str>>(lines: &[S], anchor: usize) -> String {
    let def_line = lines[..anchor.min(lines.len())]
        .iter()
        .rev()
        .map(text)
        .find(|l| {
            let t = l.trim_start();
            t.starts_with("def ") || t.starts_with("async def ")
        })
        .or_else(|| lines.get(anchor.saturating_sub(1)).map(text))
        .unwrap_or("");
    let header_indent = indent_of(def_line);

    let first_body = lines.iter().skip(anchor).map(text).find(|l| {
        let t = l.trim();
        !t.is_empty() && !t.starts_with('#')
    });
    if let Some(body) = first_body {
        if indent_width(body) > header_indent.len() {
            return indent_of(body).to_string();
        }
    }

    let unit = if header_indent.contains('\t') { "\t" } else { "    " };
    format!("{header_indent}{unit}")
}

/// 0-based inclusive line span of the string literal that opens the body
/// after 1-based `anchor`.
#[must_use]
pub fn find_docstring_span<S: AsRef<str>>(lines: &[S], anchor: usize) -> Option<(usize, usize)> {
    let (start, first) = lines
        .iter()
        .enumerate()
        .skip(anchor)
        .map(|(i, l)| (i, text(l)))
        .find(|(_, l)| {
            let t = l.trim();
            !t.is_empty() && !t.starts_with('#')
        })?;

    let (prefix, quoted) = split_prefix(first.trim_start());
    if prefix.chars().any(|c| !matches!(c, 'r' | 'R' | 'u' | 'U')) {
        return None;
    }
    let delim = delimiter(quoted)?;
    let after_open = &quoted[delim.len()..];

    if let Some(pos) = find_closing(after_open, delim) {
        return closes_cleanly(&after_open[pos + delim.len()..]).then_some((start, start));
    }
    if delim.len() == 1 {
        return None;
    }
    for (i, line) in lines.iter().enumerate().skip(start + 1) {
        let line = text(line);
        if let Some(pos) = find_closing(line, delim) {
            return closes_cleanly(&line[pos + delim.len()..]).then_some((start, i));
        }
    }
    None
}

/// Position of the first unescaped `delim` in `text`.
fn find_closing(text: &str, delim: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i..].starts_with(delim.as_bytes()) {
            return Some(i);
        }
        i += 1;
    }
    None
}

fn closes_cleanly(rest: &str) -> bool {
    let rest = rest.trim();
    rest.is_empty() || rest.starts_with('#')
}

/// A rewritten file, not yet on disk.
#[derive(Debug, Clone)]
pub struct Rewritten {
    pub text: String,
    pub warnings: Vec<String>,
}

/// Applies `changes` to `source` and checks the result still parses.
///
/// # Errors
/// Returns `RewriteFailure` when a change cannot be placed, or when valid
/// input would become invalid Python.
pub fn rewrite_source(
    path: &Path,
    source: &str,
    changes: &[Change],
    options: RenderOptions,
) -> Result<Rewritten> {
    let buffer = SourceBuffer::parse(source);
    let applied = apply(&buffer, changes, options)?;
    let text = applied.buffer.to_text();

    if lang::is_valid(source) {
        if let Err(e) = lang::parse_tree(&text) {
            return Err(DocError::rewrite(
                path,
                format!("rewritten source no longer parses ({e})"),
            ));
        }
    }
    Ok(Rewritten {
        text,
        warnings: applied.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_preserves_line_endings() {
        let text = "a = 1\r\nb = 2\r\n";
        assert_eq!(SourceBuffer::parse(text).to_text(), text);
        let text = "a = 1\nb = 2";
        assert_eq!(SourceBuffer::parse(text).to_text(), text);
    }

    #[test]
    fn test_body_indent() {
        let lines = ["class A:", "    def f(", "            x):", "        return x"];
        assert_eq!(body_indent(&lines, 3), "        ");
        let lines = ["def f(x):", "\treturn x"];
        assert_eq!(body_indent(&lines, 1), "\t");
        let lines = ["def f(x):", "", "# note", "    return x"];
        assert_eq!(body_indent(&lines, 1), "    ");
    }

    #[test]
    fn test_find_docstring_span() {
        let lines = ["def f():", "    \"\"\"One.\"\"\"", "    pass"];
        assert_eq!(find_docstring_span(&lines, 1), Some((1, 1)));

        let lines = ["def f():", "", "    r'''Two", "    lines.", "    '''", "    pass"];
        assert_eq!(find_docstring_span(&lines, 1), Some((2, 4)));

        let lines = ["def f():", "    'short'  # c", "    pass"];
        assert_eq!(find_docstring_span(&lines, 1), Some((1, 1)));

        let lines = ["def f():", "    x = 'not a docstring'"];
        assert_eq!(find_docstring_span(&lines, 1), None);

        let lines = ["def f():", "    \"\"\"Doc.\"\"\"; x = 1"];
        assert_eq!(find_docstring_span(&lines, 1), None);
    }

    #[test]
    fn test_is_header_end() {
        let lines = ["def f():  # c", "def g(): pass"];
        assert!(is_header_end(&lines, 1));
        assert!(!is_header_end(&lines, 2));
        assert!(!is_header_end(&lines, 0));
        assert!(!is_header_end(&lines, 3));
    }
}

// src/parser/lines.rs
//! Line-level position resolution.
//!
//! Everything here works on the raw source lines rather than the tree: the
//! answers must line up with what a text editor would see, including comments
//! and layout the grammar throws away. All line numbers are 1-based.

const SNIPPET_MAX_LINES: usize = 10;
const SNIPPET_MAX_CHARS: usize = 500;
const TRUNCATION_MARKER: &str = "\n    # ... (truncated)";

/// Finds the line on which a definition's header ends.
///
/// Scans forward from `start_line` (the `def` line). The first line whose
/// text ends in `:`, or whose first `:` is followed only by a comment, or
/// whose text minus a trailing comment ends in `:`, is the header line.
/// Running into a sibling definition, a docstring, `return` or `pass` first
/// means the header could not be resolved, and `start_line` is returned.
#[must_use]
pub fn header_line(lines: &[&str], start_line: usize) -> usize {
    let start = start_line.saturating_sub(1);
    let base_indent = lines.get(start).map_or(0, |l| indent_width(l));

    for (i, line) in lines.iter().enumerate().skip(start) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if i > start && indent_width(line) <= base_indent && starts_definition(trimmed) {
            break;
        }
        if terminates_header(trimmed) {
            return i + 1;
        }
        if starts_docstring(trimmed) || is_return(trimmed) || is_pass(trimmed) {
            break;
        }
    }
    start_line
}

fn terminates_header(trimmed: &str) -> bool {
    if trimmed.ends_with(':') {
        return true;
    }
    if let Some(idx) = trimmed.find(':') {
        let after = trimmed[idx + 1..].trim();
        if after.is_empty() || after.starts_with('#') {
            return true;
        }
    }
    strip_trailing_comment(trimmed).trim_end().ends_with(':')
}

/// Last line of the body: the line before the next definition at or above
/// the definition's own indentation, or the last line of the file.
#[must_use]
pub fn body_end_line(lines: &[&str], start_line: usize, header_line: usize) -> usize {
    let base_indent = lines
        .get(start_line.saturating_sub(1))
        .map_or(0, |l| indent_width(l));

    for (i, line) in lines.iter().enumerate().skip(header_line) {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            continue;
        }
        if is_def_or_class(trimmed) && indent_width(line) <= base_indent {
            return i.max(header_line);
        }
    }
    lines.len().max(header_line)
}

/// Up to ten body lines after the header, used only as generation context.
#[must_use]
pub fn body_snippet(lines: &[&str], header_line: usize, body_end_line: usize) -> Option<String> {
    let start = header_line;
    let end = (start + SNIPPET_MAX_LINES).min(body_end_line).min(lines.len());
    if start >= end {
        return None;
    }

    let mut collected: Vec<&str> = Vec::new();
    for line in &lines[start..end] {
        let line = line.trim_end();
        if collected.is_empty() && line.trim().is_empty() {
            continue;
        }
        let trimmed = line.trim_start();
        if is_def_or_class(trimmed) || trimmed.starts_with('@') {
            break;
        }
        collected.push(line);
    }
    if collected.is_empty() {
        return None;
    }

    let mut body = collected.join("\n");
    if body.chars().count() > SNIPPET_MAX_CHARS {
        body = body.chars().take(SNIPPET_MAX_CHARS).collect();
        body.push_str(TRUNCATION_MARKER);
    }
    Some(body)
}

/// Number of leading whitespace characters.
#[must_use]
pub fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Leading whitespace of `line`.
#[must_use]
pub fn indent_of(line: &str) -> &str {
    &line[..indent_width(line)]
}

/// Removes a trailing `#` comment that sits outside any string literal.
#[must_use]
pub fn strip_trailing_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (Some(_), '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (None, '"' | '\'') => quote = Some(c),
            (None, '#') => return &line[..i],
            _ => {}
        }
    }
    line
}

fn starts_definition(trimmed: &str) -> bool {
    is_def_or_class(trimmed) || trimmed.starts_with('@')
}

fn is_def_or_class(trimmed: &str) -> bool {
    trimmed.starts_with("def ") || trimmed.starts_with("async def ") || trimmed.starts_with("class ")
}

fn starts_docstring(trimmed: &str) -> bool {
    let body = trimmed.trim_start_matches(['r', 'R', 'u', 'U']);
    body.starts_with("\"\"\"") || body.starts_with("'''")
}

fn is_return(trimmed: &str) -> bool {
    trimmed == "return" || trimmed.starts_with("return ") || trimmed.starts_with("return(")
}

fn is_pass(trimmed: &str) -> bool {
    trimmed == "pass"
        || trimmed.starts_with("pass ")
        || trimmed.starts_with("pass;")
        || trimmed.starts_with("pass#")
}

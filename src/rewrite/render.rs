// src/rewrite/render.rs
//! Turns docstring body text into indented source lines.

use crate::config::FormatConfig;

const TRIPLE: &str = "\"\"\"";
const ESCAPED_TRIPLE: &str = "\\\"\\\"\\\"";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub max_line_length: usize,
    pub wrap: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&FormatConfig::default())
    }
}

impl From<&FormatConfig> for RenderOptions {
    fn from(format: &FormatConfig) -> Self {
        Self {
            max_line_length: format.max_line_length,
            wrap: format.wrap,
        }
    }
}

/// Renders `text` as a triple-quoted block at `indent`.
///
/// Short single-line bodies stay on one line; everything else opens on the
/// first body line and closes on a line of its own.
#[must_use]
pub fn render_block(text: &str, indent: &str, options: RenderOptions) -> Vec<String> {
    let prefix = if text.contains('\\') { "r" } else { "" };
    let escaped = text.replace(TRIPLE, ESCAPED_TRIPLE);
    let mut body: Vec<String> = escaped.lines().map(|l| l.trim_end().to_string()).collect();
    if body.is_empty() {
        body.push(String::new());
    }

    // a trailing quote or backslash would swallow the closing delimiter
    if body.len() == 1 && !body[0].ends_with(['"', '\\']) {
        let line = format!("{indent}{prefix}{TRIPLE}{}{TRIPLE}", body[0]);
        if line.chars().count() <= options.max_line_length {
            return vec![line];
        }
    }

    if options.wrap {
        body = wrap_lines(&body, options.max_line_length.saturating_sub(indent.len()));
    }

    let mut out = Vec::with_capacity(body.len() + 1);
    for (i, line) in body.iter().enumerate() {
        if i == 0 {
            out.push(format!("{indent}{prefix}{TRIPLE}{line}"));
        } else if line.is_empty() {
            out.push(String::new());
        } else {
            out.push(format!("{indent}{line}"));
        }
    }
    out.push(format!("{indent}{TRIPLE}"));
    out
}

/// Greedy word wrap. Each continuation keeps the leading whitespace of the
/// line it was split from; words longer than `width` are never broken.
#[must_use]
pub fn wrap_lines(lines: &[String], width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in lines {
        if width == 0 || line.chars().count() <= width {
            out.push(line.clone());
            continue;
        }
        let lead_len = line.len() - line.trim_start().len();
        let lead = &line[..lead_len];
        let mut current = String::from(lead);
        for word in line.split_whitespace() {
            let fits = current.len() == lead_len
                || current.chars().count() + 1 + word.chars().count() <= width;
            if !fits {
                out.push(std::mem::replace(&mut current, String::from(lead)));
            }
            if current.len() > lead_len {
                current.push(' ');
            }
            current.push_str(word);
        }
        out.push(current);
    }
    out
}

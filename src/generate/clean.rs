// src/generate/clean.rs
//! Normalizes raw model output into bare docstring body text.

use crate::error::{DocError, Result};
use crate::parser::lines::indent_width;
use regex::Regex;
use std::sync::LazyLock;

// ```python ... ``` wrapping the whole reply
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_+-]*[ \t]*\r?\n(.*?)\s*```$")
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// Strips code fences, enclosing quote delimiters and common indentation.
///
/// # Errors
/// Returns `GenerationFailure` for `provider` when nothing is left.
pub fn clean_generated(provider: &str, raw: &str) -> Result<String> {
    let text = strip_fences(raw.trim());
    let text = strip_quotes(text.trim());
    let text = dedent(text);
    let text = text.trim();
    if text.is_empty() {
        return Err(DocError::generation(provider, "empty docstring after cleaning"));
    }
    Ok(text.to_string())
}

fn strip_fences(text: &str) -> &str {
    if let Some(body) = FENCE_RE.captures(text).and_then(|c| c.get(1)) {
        return body.as_str();
    }
    // unterminated fence: drop the opening line only
    match text.strip_prefix("```") {
        Some(rest) => rest.split_once('\n').map_or("", |(_, b)| b),
        None => text,
    }
}

fn strip_quotes(text: &str) -> &str {
    let unprefixed = text.trim_start_matches(['r', 'R', 'u', 'U']);
    for delim in ["\"\"\"", "'''"] {
        if let Some(inner) = unprefixed.strip_prefix(delim) {
            return inner.strip_suffix(delim).unwrap_or(inner);
        }
    }
    text.strip_suffix("\"\"\"").unwrap_or(text)
}

/// Removes the indentation shared by all non-blank lines after the first.
///
/// The first line usually hugs the opening delimiter and carries no indent,
/// so it is excluded from the common prefix.
#[must_use]
pub fn dedent(text: &str) -> String {
    let mut lines = text.lines();
    let Some(first) = lines.next() else {
        return String::new();
    };
    let rest: Vec<&str> = lines.collect();
    let common = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indent_width(l))
        .min()
        .unwrap_or(0);

    let mut out = vec![first.trim().to_string()];
    out.extend(rest.iter().map(|l| {
        if l.trim().is_empty() {
            String::new()
        } else {
            l[common..].trim_end().to_string()
        }
    }));
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_fences_and_quotes() {
        let raw = "```python\n\"\"\"Add two numbers.\n\n    Args:\n        a: First.\n    \"\"\"\n```";
        assert_eq!(
            clean_generated("test", raw).unwrap(),
            "Add two numbers.\n\nArgs:\n    a: First."
        );
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(clean_generated("test", "  Return x.  ").unwrap(), "Return x.");
    }

    #[test]
    fn test_empty_is_failure() {
        let err = clean_generated("test", "```\n\"\"\"\"\"\"\n```").unwrap_err();
        assert!(matches!(err, DocError::GenerationFailure { .. }));
    }

    #[test]
    fn test_unterminated_fence() {
        assert_eq!(clean_generated("t", "```\nCompute it.").unwrap(), "Compute it.");
    }

    #[test]
    fn test_dedent_ignores_unicode_spaces() {
        let out = clean_generated("t", "Summary.\n  Args:\n\u{3000}x: thing.").unwrap();
        assert_eq!(out, "Summary.\n  Args:\n\u{3000}x: thing.");
        assert_eq!(dedent("A.\n    b\n  \u{3000}c"), "A.\n  b\n\u{3000}c");
    }

    #[test]
    fn test_prefixed_quotes() {
        assert_eq!(clean_generated("t", "r'''Path a\\b.'''").unwrap(), "Path a\\b.");
    }
}

// src/generate/prompt.rs
//! Prompt text shared by every provider.

use crate::config::FormatConfig;
use crate::model::{DocstringStyle, FunctionRecord, Parameter};
use std::fmt::Write;

pub const SYSTEM_PROMPT: &str = "You are a Python documentation expert.";

const RAISE_KEYWORDS: &[&str] = &["raise", "except", "error", "assert", "if ", "validation", "check"];
const MISSING_BODY: &str = "# Function body not available";

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptOptions {
    pub include_examples: bool,
    pub include_type_hints: bool,
    pub include_raises: bool,
    pub include_returns: bool,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self::from(&FormatConfig::default())
    }
}

impl From<&FormatConfig> for PromptOptions {
    fn from(format: &FormatConfig) -> Self {
        Self {
            include_examples: format.include_examples,
            include_type_hints: format.include_type_hints,
            include_raises: format.include_raises,
            include_returns: format.include_returns,
        }
    }
}

/// True when the body snippet hints at validation or error paths.
#[must_use]
pub fn might_raise(record: &FunctionRecord) -> bool {
    record.body_snippet.as_deref().is_some_and(|body| {
        let lower = body.to_lowercase();
        RAISE_KEYWORDS.iter().any(|k| lower.contains(k))
    })
}

fn context_sentence(record: &FunctionRecord) -> String {
    let mut parts = Vec::new();
    if let Some(owner) = &record.enclosing_type_name {
        parts.push(format!("This is a method of the {owner} class."));
    }
    if record.is_async {
        parts.push("This is an async function.".to_string());
    }
    if record.is_special() {
        parts.push("This is a special/magic method.".to_string());
    }
    if parts.is_empty() {
        "This is a regular function.".to_string()
    } else {
        parts.join(" ")
    }
}

fn describe_parameter(param: &Parameter, with_types: bool) -> String {
    let mut line = String::from("  - ");
    if param.is_vararg {
        line.push('*');
    } else if param.is_kwarg {
        line.push_str("**");
    }
    line.push_str(&param.name);
    if with_types {
        let _ = write!(line, ": {}", param.type_name);
    }
    if !param.required {
        let default = param.default.as_deref().unwrap_or("None");
        let _ = write!(line, " (optional, default: {default})");
    }
    if param.keyword_only {
        line.push_str(" [keyword-only]");
    }
    line
}

/// Builds the user prompt for `record` in `style`.
#[must_use]
pub fn build(record: &FunctionRecord, style: DocstringStyle, options: PromptOptions) -> String {
    let params = if record.parameters.is_empty() {
        "  - No parameters".to_string()
    } else {
        record
            .parameters
            .iter()
            .map(|p| describe_parameter(p, options.include_type_hints))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let body = record
        .body_snippet
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .unwrap_or(MISSING_BODY);
    let returns = record.return_type.as_deref().unwrap_or("None/unspecified");
    let raises = options.include_raises && might_raise(record);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "You are an expert Python developer. Write a concise, accurate docstring for this function.\n"
    );
    let _ = writeln!(out, "FUNCTION:\n{}\n", record.signature_text);
    let _ = writeln!(out, "FUNCTION BODY:\n{body}\n");
    let _ = writeln!(out, "ANALYSIS:");
    let _ = writeln!(out, "- Function name: {}", record.name);
    let _ = writeln!(out, "- {}", context_sentence(record));
    let _ = writeln!(out, "- Parameters:\n{params}");
    let _ = writeln!(out, "- Returns: {returns}");
    let _ = writeln!(out, "- Might raise exceptions: {}\n", if raises { "True" } else { "False" });

    let _ = writeln!(out, "REQUIREMENTS:");
    let _ = writeln!(out, "1. Write ONLY the docstring content (no triple quotes)");
    let _ = writeln!(out, "2. Start with a brief, clear description of what the function does");
    let _ = writeln!(out, "3. Be concise; avoid filler like \"This function\"");
    let _ = writeln!(out, "4. ONLY include sections that are relevant:");
    let _ = writeln!(out, "   - Include an arguments section ONLY if the function has parameters");
    if options.include_returns {
        let _ = writeln!(out, "   - Include a returns section ONLY if the function returns something meaningful");
    } else {
        let _ = writeln!(out, "   - Do not include a returns section");
    }
    if options.include_raises {
        let _ = writeln!(out, "   - Include a raises section ONLY if the function might raise exceptions");
    } else {
        let _ = writeln!(out, "   - Do not include a raises section");
    }
    if !options.include_type_hints {
        let _ = writeln!(out, "   - Do not repeat type information in the docstring");
    }
    let _ = writeln!(out, "5. Use {style} format");
    let _ = writeln!(out, "6. Keep descriptions short and precise\n");

    if options.include_examples {
        let _ = writeln!(out, "STYLE EXAMPLE:\n{}\n", style_example(style));
    }
    out.push_str("Generate a concise docstring:");
    out
}

#[must_use]
pub fn style_example(style: DocstringStyle) -> &'static str {
    match style {
        DocstringStyle::Google => GOOGLE_EXAMPLE,
        DocstringStyle::Numpy => NUMPY_EXAMPLE,
        DocstringStyle::Restructuredtext => RST_EXAMPLE,
    }
}

const GOOGLE_EXAMPLE: &str = r#"def calculate_area(radius: float) -> float:
    """Calculate the area of a circle.

    Args:
        radius: The radius of the circle in meters.

    Returns:
        The area in square meters.

    Raises:
        ValueError: If radius is negative.
    """"#;

const NUMPY_EXAMPLE: &str = r#"def calculate_area(radius: float) -> float:
    """
    Calculate the area of a circle.

    Parameters
    ----------
    radius : float
        The radius of the circle in meters.

    Returns
    -------
    float
        The area in square meters.

    Raises
    ------
    ValueError
        If radius is negative.
    """"#;

const RST_EXAMPLE: &str = r#"def calculate_area(radius: float) -> float:
    """
    Calculate the area of a circle.

    :param radius: The radius of the circle in meters.
    :type radius: float
    :returns: The area in square meters.
    :rtype: float
    :raises ValueError: If radius is negative.
    """"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn first(src: &str) -> FunctionRecord {
        parser::parse(src).unwrap().remove(0)
    }

    #[test]
    fn test_prompt_mentions_record_details() {
        let rec = first("class Shape:\n    async def scale(self, by: float = 1.0) -> 'Shape':\n        if by < 0:\n            raise ValueError\n        return self\n");
        let prompt = build(&rec, DocstringStyle::Numpy, PromptOptions::default());
        assert!(prompt.contains("async def scale(self, by: float = 1.0) -> 'Shape'"));
        assert!(prompt.contains("method of the Shape class"));
        assert!(prompt.contains("This is an async function."));
        assert!(prompt.contains("by: float (optional, default: 1.0)"));
        assert!(prompt.contains("Might raise exceptions: True"));
        assert!(prompt.contains("Use numpy format"));
        assert!(prompt.contains("Parameters\n    ----------"));
    }

    #[test]
    fn test_switches_trim_prompt() {
        let rec = first("def f(x):\n    return x\n");
        let options = PromptOptions {
            include_examples: false,
            include_type_hints: false,
            include_raises: false,
            include_returns: true,
        };
        let prompt = build(&rec, DocstringStyle::Google, options);
        assert!(!prompt.contains("STYLE EXAMPLE"));
        assert!(prompt.contains("  - x\n"));
        assert!(prompt.contains("Do not include a raises section"));
        assert!(prompt.contains("This is a regular function."));
    }
}

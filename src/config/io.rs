// src/config/io.rs
use super::Config;
use crate::error::{DocError, Result};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "docwright.toml";

const DEFAULT_TEMPLATE: &str = r#"# docwright configuration

[llm]
provider = "openai"
model = "gpt-4"
api_key = "${OPENAI_API_KEY}"
temperature = 0.1
timeout_secs = 30
# provider = "ollama"
# model = "llama2"
# base_url = "http://localhost:11434"

[format]
style = "google"
include_examples = true
include_type_hints = true
include_raises = true
include_returns = true
max_line_length = 88
wrap = false

[processing]
dry_run = false
backup_files = true
max_file_size = 1000000
include_patterns = ["*.py"]
exclude_patterns = ["*/tests/*", "*/migrations/*", "*/venv/*", "*/__pycache__/*", "*/build/*", "*/dist/*"]

[output]
verbose = true
show_diff = true
format = "text"
"#;

/// Reads and deserializes a config file, also returning the raw table so
/// callers can tell which keys the file actually set.
///
/// # Errors
/// Returns `Io` if the file cannot be read, `ConfigInvalid` if it is not valid TOML
/// or contains unknown keys.
pub fn read_file(path: &Path) -> Result<(Config, toml::Table)> {
    let content = fs::read_to_string(path).map_err(|e| DocError::io(e, path))?;
    parse(&content).map_err(|e| match e {
        DocError::ConfigInvalid(msg) => {
            DocError::ConfigInvalid(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

/// Parses TOML text into a config plus its raw table.
///
/// # Errors
/// Returns `ConfigInvalid` on malformed TOML or unknown keys.
pub fn parse(content: &str) -> Result<(Config, toml::Table)> {
    let table: toml::Table = content
        .parse()
        .map_err(|e: toml::de::Error| DocError::ConfigInvalid(e.message().to_string()))?;
    let config: Config =
        toml::from_str(content).map_err(|e| DocError::ConfigInvalid(e.message().to_string()))?;
    Ok((config, table))
}

/// Writes the commented default configuration to `path`.
///
/// Returns `false` without touching anything when the file already exists.
///
/// # Errors
/// Returns `Io` if the file cannot be written.
pub fn write_default(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    fs::write(path, DEFAULT_TEMPLATE).map_err(|e| DocError::io(e, path))?;
    Ok(true)
}

/// True when `[section] key` is present in the raw table.
#[must_use]
pub fn is_set(table: &toml::Table, section: &str, key: &str) -> bool {
    table
        .get(section)
        .and_then(toml::Value::as_table)
        .is_some_and(|t| t.contains_key(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses() {
        let (config, table) = parse(DEFAULT_TEMPLATE).unwrap();
        assert_eq!(config.llm.model, "gpt-4");
        assert_eq!(config.processing.exclude_patterns.len(), 6);
        assert!(is_set(&table, "llm", "api_key"));
        assert!(!is_set(&table, "llm", "base_url"));
    }
}

// src/config/mod.rs
pub mod io;
pub mod types;

pub use self::io::CONFIG_FILE;
pub use self::types::{Config, FormatConfig, LlmConfig, OutputConfig, OutputFormat, ProcessingConfig};

use crate::error::{DocError, Result};
use crate::generate::ProviderKind;
use std::path::Path;

pub const ENV_PROVIDER: &str = "DOCWRIGHT_PROVIDER";
pub const ENV_MODEL: &str = "DOCWRIGHT_MODEL";
pub const ENV_OPENAI_KEY: &str = "OPENAI_API_KEY";
pub const ENV_ANTHROPIC_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_OLLAMA_URL: &str = "OLLAMA_BASE_URL";

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `docwright.toml` from `dir` when present, then fills unset values
    /// from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigInvalid` on a malformed file or a bad environment value.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::load_file(&path)
        } else {
            let mut config = Self::new();
            config.apply_env(&toml::Table::new(), |k| std::env::var(k).ok())?;
            Ok(config)
        }
    }

    /// Loads an explicit config file, then fills unset values from the environment.
    ///
    /// # Errors
    /// Returns `Io` if the file is missing, `ConfigInvalid` if it is malformed.
    pub fn load_file(path: &Path) -> Result<Self> {
        let (mut config, table) = io::read_file(path)?;
        config.apply_env(&table, |k| std::env::var(k).ok())?;
        Ok(config)
    }

    /// Parses TOML text without consulting the environment.
    ///
    /// # Errors
    /// Returns `ConfigInvalid` on malformed TOML or unknown keys.
    pub fn from_toml(content: &str) -> Result<Self> {
        io::parse(content).map(|(config, _)| config)
    }

    /// Fills values the file left unset from `lookup` and expands a
    /// `${VAR}` API key.
    ///
    /// # Errors
    /// Returns `ConfigInvalid` when `DOCWRIGHT_PROVIDER` names an unknown provider.
    pub fn apply_env<F>(&mut self, table: &toml::Table, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if !io::is_set(table, "llm", "provider") {
            if let Some(raw) = lookup(ENV_PROVIDER) {
                self.llm.provider = raw.parse()?;
            }
        }
        if !io::is_set(table, "llm", "model") {
            if let Some(model) = lookup(ENV_MODEL) {
                self.llm.model = model;
            }
        }

        self.llm.api_key = match self.llm.api_key.take() {
            Some(key) => expand_var(&key, &lookup),
            None => api_key_var(self.llm.provider).and_then(|var| lookup(var)),
        };

        if self.llm.provider == ProviderKind::Ollama && self.llm.base_url.is_none() {
            self.llm.base_url = lookup(ENV_OLLAMA_URL);
        }
        Ok(())
    }

    /// Switches provider after loading. A key belonging to the previous
    /// provider is dropped and the new provider's variable is consulted.
    pub fn override_provider<F>(&mut self, provider: ProviderKind, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if provider == self.llm.provider {
            return;
        }
        self.llm.provider = provider;
        self.llm.api_key = api_key_var(provider).and_then(|var| lookup(var));
        if provider == ProviderKind::Ollama && self.llm.base_url.is_none() {
            self.llm.base_url = lookup(ENV_OLLAMA_URL);
        }
    }

    /// Checks value ranges, credentials and glob syntax.
    ///
    /// # Errors
    /// Returns `ConfigInvalid` naming the first problem found.
    pub fn validate(&self) -> Result<()> {
        let needs_key = matches!(self.llm.provider, ProviderKind::OpenAi | ProviderKind::Anthropic);
        if needs_key && self.llm.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(DocError::ConfigInvalid(format!(
                "API key required for provider '{}'",
                self.llm.provider
            )));
        }
        if self.processing.max_file_size == 0 {
            return Err(DocError::ConfigInvalid(
                "max_file_size must be greater than 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(DocError::ConfigInvalid(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }
        if self.format.max_line_length == 0 {
            return Err(DocError::ConfigInvalid(
                "max_line_length must be greater than 0".into(),
            ));
        }
        for pattern in self
            .processing
            .include_patterns
            .iter()
            .chain(&self.processing.exclude_patterns)
        {
            glob::Pattern::new(pattern)?;
        }
        Ok(())
    }

    /// Writes the default configuration file; never overwrites.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be written.
    pub fn write_default(path: &Path) -> Result<bool> {
        io::write_default(path)
    }
}

/// Environment variable holding the provider's API key.
#[must_use]
pub fn api_key_var(provider: ProviderKind) -> Option<&'static str> {
    match provider {
        ProviderKind::OpenAi => Some(ENV_OPENAI_KEY),
        ProviderKind::Anthropic => Some(ENV_ANTHROPIC_KEY),
        ProviderKind::Ollama => None,
    }
}

/// Expands a value of the exact form `${VAR}`; other values pass through.
fn expand_var<F>(value: &str, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match value.strip_prefix("${").and_then(|v| v.strip_suffix('}')) {
        Some(var) => lookup(var),
        None => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_expand_var() {
        let lookup = env(&[("KEY", "sk-1")]);
        assert_eq!(expand_var("${KEY}", &lookup).as_deref(), Some("sk-1"));
        assert_eq!(expand_var("${MISSING}", &lookup), None);
        assert_eq!(expand_var("plain", &lookup).as_deref(), Some("plain"));
    }

    #[test]
    fn test_file_values_beat_environment() {
        let (mut config, table) =
            io::parse("[llm]\nprovider = \"anthropic\"\nmodel = \"claude\"\n").unwrap();
        config
            .apply_env(
                &table,
                env(&[
                    (ENV_PROVIDER, "openai"),
                    (ENV_MODEL, "gpt-4o"),
                    (ENV_ANTHROPIC_KEY, "ak"),
                    (ENV_OPENAI_KEY, "ok"),
                ]),
            )
            .unwrap();
        assert_eq!(config.llm.provider, ProviderKind::Anthropic);
        assert_eq!(config.llm.model, "claude");
        assert_eq!(config.llm.api_key.as_deref(), Some("ak"));
    }

    #[test]
    fn test_environment_fills_gaps() {
        let mut config = Config::new();
        config
            .apply_env(
                &toml::Table::new(),
                env(&[(ENV_PROVIDER, "ollama"), (ENV_OLLAMA_URL, "http://gpu:11434")]),
            )
            .unwrap();
        assert_eq!(config.llm.provider, ProviderKind::Ollama);
        assert_eq!(config.llm.base_url.as_deref(), Some("http://gpu:11434"));
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_unknown_provider_in_env() {
        let mut config = Config::new();
        let err = config
            .apply_env(&toml::Table::new(), env(&[(ENV_PROVIDER, "local")]))
            .unwrap_err();
        assert!(matches!(err, DocError::ConfigInvalid(_)));
    }

    #[test]
    fn test_override_provider_swaps_key() {
        let mut config = Config::new();
        config.llm.api_key = Some("openai-key".into());
        config.override_provider(ProviderKind::Anthropic, env(&[(ENV_ANTHROPIC_KEY, "ak")]));
        assert_eq!(config.llm.provider, ProviderKind::Anthropic);
        assert_eq!(config.llm.api_key.as_deref(), Some("ak"));

        config.override_provider(ProviderKind::Anthropic, env(&[]));
        assert_eq!(config.llm.api_key.as_deref(), Some("ak"));
    }
}

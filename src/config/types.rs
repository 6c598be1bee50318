// src/config/types.rs
use crate::generate::ProviderKind;
use crate::model::DocstringStyle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub format: FormatConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: default_model(),
            api_key: None,
            base_url: None,
            temperature: default_temperature(),
            max_tokens: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatConfig {
    #[serde(default)]
    pub style: DocstringStyle,
    #[serde(default = "default_true")]
    pub include_examples: bool,
    #[serde(default = "default_true")]
    pub include_type_hints: bool,
    #[serde(default = "default_true")]
    pub include_raises: bool,
    #[serde(default = "default_true")]
    pub include_returns: bool,
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    #[serde(default)]
    pub wrap: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            style: DocstringStyle::default(),
            include_examples: true,
            include_type_hints: true,
            include_raises: true,
            include_returns: true,
            max_line_length: default_max_line_length(),
            wrap: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessingConfig {
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default = "default_true")]
    pub backup_files: bool,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup_files: true,
            max_file_size: default_max_file_size(),
            include_patterns: default_include_patterns(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub verbose: bool,
    #[serde(default = "default_true")]
    pub show_diff: bool,
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            verbose: true,
            show_diff: true,
            format: OutputFormat::Text,
        }
    }
}

const fn default_true() -> bool { true }
const fn default_temperature() -> f32 { 0.1 }
const fn default_timeout_secs() -> u64 { 30 }
const fn default_max_line_length() -> usize { 88 }
const fn default_max_file_size() -> u64 { 1_000_000 }

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_include_patterns() -> Vec<String> {
    vec!["*.py".into()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec!["*/tests/*".into(), "*/migrations/*".into(), "*/venv/*".into()]
}

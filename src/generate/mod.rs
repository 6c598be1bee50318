// src/generate/mod.rs
//! Docstring generation backends.
//!
//! Every backend sits behind [`Generator`]; the processor never knows which
//! provider it is talking to.

pub mod anthropic;
pub mod clean;
mod http;
pub mod ollama;
pub mod openai;
pub mod prompt;

use crate::config::{FormatConfig, LlmConfig};
use crate::error::{DocError, Result};
use crate::model::{DocstringStyle, FunctionRecord};
use crate::tokens;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub use self::prompt::PromptOptions;

/// Raw provider output for one function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Generation {
    pub content: String,
    pub model: String,
    pub usage: BTreeMap<String, u64>,
    pub finish_reason: String,
}

impl Generation {
    /// Fills `usage` with local estimates when the provider sent none.
    #[must_use]
    pub fn with_estimated_usage(mut self, prompt: &str) -> Self {
        if self.usage.is_empty() {
            self.usage = tokens::estimate_usage(prompt, &self.content);
        }
        self
    }
}

/// Turns a function record into draft docstring text.
pub trait Generator {
    /// Provider name used in error messages and logs.
    fn name(&self) -> &str;

    /// # Errors
    /// Returns `GenerationFailure` on any transport or provider error.
    fn generate(&self, record: &FunctionRecord, style: DocstringStyle) -> Result<Generation>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    #[value(name = "openai")]
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    Ollama,
}

impl ProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Ollama => "ollama",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            other => Err(DocError::ConfigInvalid(format!(
                "unsupported provider '{other}' (expected openai, anthropic or ollama)"
            ))),
        }
    }
}

/// Builds the backend named by `llm.provider`.
///
/// # Errors
/// Returns `ConfigInvalid` when credentials are missing or an Ollama server
/// does not answer.
pub fn build_generator(llm: &LlmConfig, format: &FormatConfig) -> Result<Box<dyn Generator>> {
    let options = PromptOptions::from(format);
    let generator: Box<dyn Generator> = match llm.provider {
        ProviderKind::OpenAi => Box::new(openai::OpenAiGenerator::new(llm, options)?),
        ProviderKind::Anthropic => Box::new(anthropic::AnthropicGenerator::new(llm, options)?),
        ProviderKind::Ollama => Box::new(ollama::OllamaGenerator::connect(llm, options)?),
    };
    tracing::debug!(provider = generator.name(), model = %llm.model, "generator ready");
    Ok(generator)
}

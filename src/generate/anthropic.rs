// src/generate/anthropic.rs
use super::clean::clean_generated;
use super::http::{self, join_url};
use super::openai::numeric_usage;
use super::prompt::{self, PromptOptions, SYSTEM_PROMPT};
use super::{Generation, Generator};
use crate::config::LlmConfig;
use crate::error::{DocError, Result};
use crate::model::{DocstringStyle, FunctionRecord};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1000;
const NAME: &str = "anthropic";

pub struct AnthropicGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
    options: PromptOptions,
}

impl AnthropicGenerator {
    /// # Errors
    /// Returns `ConfigInvalid` when no API key is configured.
    pub fn new(llm: &LlmConfig, options: PromptOptions) -> Result<Self> {
        let api_key = llm
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| DocError::ConfigInvalid("Anthropic API key is required".into()))?;
        Ok(Self {
            client: http::client(NAME, Duration::from_secs(llm.timeout_secs))?,
            api_key,
            model: llm.model.clone(),
            base_url: llm.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            temperature: llm.temperature,
            max_tokens: llm.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            options,
        })
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    model: Option<String>,
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl Generator for AnthropicGenerator {
    fn name(&self) -> &str {
        NAME
    }

    fn generate(&self, record: &FunctionRecord, style: DocstringStyle) -> Result<Generation> {
        let prompt = prompt::build(record, style, self.options);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: SYSTEM_PROMPT,
            messages: vec![Message { role: "user", content: &prompt }],
        };

        let request = self
            .client
            .post(join_url(&self.base_url, "messages"))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body);
        let response: MessagesResponse = http::send_json(NAME, request)?;

        let text: String = response
            .content
            .iter()
            .filter(|b| b.kind.is_empty() || b.kind == "text")
            .filter_map(|b| b.text.as_deref())
            .collect();
        let content = clean_generated(NAME, &text)?;

        Ok(Generation {
            content,
            model: response.model.unwrap_or_else(|| self.model.clone()),
            usage: numeric_usage(response.usage),
            finish_reason: response.stop_reason.unwrap_or_default(),
        }
        .with_estimated_usage(&prompt))
    }
}

// src/generate/openai.rs
use super::clean::clean_generated;
use super::http::{self, join_url};
use super::prompt::{self, PromptOptions, SYSTEM_PROMPT};
use super::{Generation, Generator};
use crate::config::LlmConfig;
use crate::error::{DocError, Result};
use crate::model::{DocstringStyle, FunctionRecord};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const NAME: &str = "openai";

pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: Option<u32>,
    options: PromptOptions,
}

impl OpenAiGenerator {
    /// # Errors
    /// Returns `ConfigInvalid` when no API key is configured.
    pub fn new(llm: &LlmConfig, options: PromptOptions) -> Result<Self> {
        let api_key = llm
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| DocError::ConfigInvalid("OpenAI API key is required".into()))?;
        Ok(Self {
            client: http::client(NAME, Duration::from_secs(llm.timeout_secs))?,
            api_key,
            model: llm.model.clone(),
            base_url: llm.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
            options,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Keeps the integer counters of a provider usage object.
pub(crate) fn numeric_usage(usage: Option<BTreeMap<String, serde_json::Value>>) -> BTreeMap<String, u64> {
    usage
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| v.as_u64().map(|n| (k, n)))
        .collect()
}

impl Generator for OpenAiGenerator {
    fn name(&self) -> &str {
        NAME
    }

    fn generate(&self, record: &FunctionRecord, style: DocstringStyle) -> Result<Generation> {
        let prompt = prompt::build(record, style, self.options);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &prompt },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let request = self
            .client
            .post(join_url(&self.base_url, "chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body);
        let response: ChatResponse = http::send_json(NAME, request)?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DocError::generation(NAME, "response contained no choices"))?;
        let content = clean_generated(NAME, choice.message.content.as_deref().unwrap_or_default())?;

        Ok(Generation {
            content,
            model: response.model.unwrap_or_else(|| self.model.clone()),
            usage: numeric_usage(response.usage),
            finish_reason: choice.finish_reason.unwrap_or_default(),
        }
        .with_estimated_usage(&prompt))
    }
}

// src/generate/ollama.rs
//! Local models served by Ollama.

use super::clean::clean_generated;
use super::http::{self, join_url};
use super::prompt::{self, PromptOptions};
use super::{Generation, Generator};
use crate::config::LlmConfig;
use crate::error::{DocError, Result};
use crate::model::{DocstringStyle, FunctionRecord};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_NUM_PREDICT: u32 = 1024;
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);
const NAME: &str = "ollama";

pub struct OllamaGenerator {
    client: Client,
    model: String,
    base_url: String,
    temperature: f32,
    num_predict: u32,
    options: PromptOptions,
}

impl OllamaGenerator {
    /// Connects to the server, checking it answers `/api/tags` first.
    ///
    /// # Errors
    /// Returns `ConfigInvalid` when the server cannot be reached.
    pub fn connect(llm: &LlmConfig, options: PromptOptions) -> Result<Self> {
        let base_url = llm
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let probe = http::client(NAME, PROBE_TIMEOUT)?;
        probe
            .get(join_url(&base_url, "api/tags"))
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| {
                DocError::ConfigInvalid(format!("cannot connect to Ollama at {base_url}: {e}"))
            })?;

        Ok(Self {
            client: http::client(NAME, Duration::from_secs(llm.timeout_secs))?,
            model: llm.model.clone(),
            base_url,
            temperature: llm.temperature,
            num_predict: llm.max_tokens.unwrap_or(DEFAULT_NUM_PREDICT),
            options,
        })
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: ModelOptions,
}

#[derive(Debug, Serialize)]
struct ModelOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    response: String,
    #[serde(default = "default_done")]
    done: bool,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    #[serde(default)]
    eval_count: Option<u64>,
}

const fn default_done() -> bool {
    true
}

impl Generator for OllamaGenerator {
    fn name(&self) -> &str {
        NAME
    }

    fn generate(&self, record: &FunctionRecord, style: DocstringStyle) -> Result<Generation> {
        let prompt = prompt::build(record, style, self.options);
        let body = GenerateRequest {
            model: &self.model,
            prompt: &prompt,
            stream: false,
            options: ModelOptions {
                temperature: self.temperature,
                num_predict: self.num_predict,
            },
        };

        let request = self
            .client
            .post(join_url(&self.base_url, "api/generate"))
            .json(&body);
        let response: GenerateResponse = http::send_json(NAME, request)?;
        let content = clean_generated(NAME, &response.response)?;

        let mut usage = BTreeMap::new();
        if let Some(n) = response.prompt_eval_count {
            usage.insert("prompt_tokens".to_string(), n);
        }
        if let Some(n) = response.eval_count {
            usage.insert("completion_tokens".to_string(), n);
        }

        Ok(Generation {
            content,
            model: response.model.unwrap_or_else(|| self.model.clone()),
            usage,
            finish_reason: if response.done { "stop" } else { "length" }.to_string(),
        }
        .with_estimated_usage(&prompt))
    }
}

// src/tokens.rs
//! Local token estimates for providers that report no usage.

use std::collections::BTreeMap;
use std::sync::LazyLock;
use tiktoken_rs::CoreBPE;

// cl100k_base, loaded on first use
static BPE: LazyLock<Option<CoreBPE>> = LazyLock::new(|| {
    tiktoken_rs::cl100k_base()
        .map_err(|e| tracing::error!("failed to load cl100k_base tokenizer: {e}"))
        .ok()
});

/// Token count of `text`, or 0 when the encoding could not be loaded.
#[must_use]
pub fn count(text: &str) -> usize {
    BPE.as_ref()
        .map_or(0, |bpe| bpe.encode_ordinary(text).len())
}

#[must_use]
pub fn is_available() -> bool {
    BPE.is_some()
}

/// Usage map in the OpenAI shape: `prompt_tokens`, `completion_tokens`
/// and `total_tokens`. Empty when no tokenizer is available.
#[must_use]
pub fn estimate_usage(prompt: &str, completion: &str) -> BTreeMap<String, u64> {
    let mut usage = BTreeMap::new();
    if !is_available() {
        return usage;
    }
    let prompt_tokens = count(prompt) as u64;
    let completion_tokens = count(completion) as u64;
    usage.insert("prompt_tokens".to_string(), prompt_tokens);
    usage.insert("completion_tokens".to_string(), completion_tokens);
    usage.insert("total_tokens".to_string(), prompt_tokens + completion_tokens);
    usage
}

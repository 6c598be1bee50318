// src/generate/http.rs
use crate::error::{DocError, Result};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

const ERROR_BODY_LIMIT: usize = 300;

pub(crate) fn client(provider: &str, timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DocError::ConfigInvalid(format!("{provider}: failed to create HTTP client: {e}")))
}

/// Sends `request` and decodes a JSON body, mapping every failure to
/// `GenerationFailure` for `provider`.
pub(crate) fn send_json<T: DeserializeOwned>(provider: &str, request: RequestBuilder) -> Result<T> {
    let response = request
        .send()
        .map_err(|e| DocError::generation(provider, format!("request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        let body: String = body.chars().take(ERROR_BODY_LIMIT).collect();
        return Err(DocError::generation(
            provider,
            format!("HTTP {status}: {}", body.trim()),
        ));
    }

    response
        .json::<T>()
        .map_err(|e| DocError::generation(provider, format!("invalid response body: {e}")))
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

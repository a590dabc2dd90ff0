//! Client for the hosted text-generation endpoint.
//!
//! Speaks the OpenAI Responses API: `POST {base_url}/responses` with
//! `{ model, instructions, input }`. Model output is free text; callers pull
//! the first balanced JSON object or array out of it and parse that strictly.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::LlmConfig;

/// Hosted-model errors. Any of these fails the whole call.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("hosted model is not configured (set OPENAI_API_KEY)")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Model backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("no JSON payload in model response")]
    MissingJson,

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid model output: {0}")]
    Invalid(String),
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    instructions: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesResponse {
    fn into_text(self) -> String {
        if let Some(text) = self.output_text {
            return text;
        }
        self.output
            .into_iter()
            .flat_map(|item| item.content)
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Hosted-model client.
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Send one instruction/input pair and return the model's text output.
    pub async fn complete(
        &self,
        model: &str,
        instructions: &str,
        input: &str,
    ) -> Result<String, LlmError> {
        let api_key = self.config.api_key.as_deref().ok_or(LlmError::NotConfigured)?;
        let url = format!("{}/responses", self.config.base_url);

        tracing::debug!(model, input_len = input.len(), "calling hosted model");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&ResponsesRequest {
                model,
                instructions,
                input,
            })
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(LlmError::Backend { status, message });
        }

        let body: ResponsesResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(body.into_text())
    }

    /// Call the model and parse the first JSON span opening with `open`.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        model: &str,
        instructions: &str,
        input: &str,
        open: char,
    ) -> Result<T, LlmError> {
        let text = self.complete(model, instructions, input).await?;
        let span = extract_json_span(&text, open).ok_or(LlmError::MissingJson)?;
        serde_json::from_str(span).map_err(|e| LlmError::Parse(e.to_string()))
    }
}

/// First balanced `{...}` or `[...]` span in `text`, starting at the first
/// `open` character. Brackets inside string literals are ignored.
pub fn extract_json_span(text: &str, open: char) -> Option<&str> {
    let close = match open {
        '{' => '}',
        '[' => ']',
        _ => return None,
    };

    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}

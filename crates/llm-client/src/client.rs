//! LLM Client (C6): one-shot chat-completion decision call with retry,
//! JSON-mode, and an optional vision attachment (§4.5).

use std::time::Duration;

use auspex_core_types::{LlmEndpoint, SamplingParams};
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::LlmClientError;

const MAX_ATTEMPTS: u32 = 4; // initial attempt + 3 retries (1s, 2s, 4s backoff)
const BASE_DELAY_MS: u64 = 1_000;
const TRANSIENT_NETWORK_MARKERS: &[&str] =
    &["econnreset", "etimedout", "socket hang up", "fetch failed"];

/// Token accounting for a single `decide` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

pub struct LlmClient {
    http: Client,
    endpoint: LlmEndpoint,
    sampling: SamplingParams,
}

impl LlmClient {
    pub fn new(endpoint: LlmEndpoint, sampling: SamplingParams) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            sampling,
        }
    }

    pub fn model(&self) -> &str {
        &self.endpoint.model
    }

    /// One decision call: `system` + `user` messages, optionally with a JPEG
    /// screenshot attached as an image content part. JSON response-format is
    /// requested only when no screenshot is attached.
    pub async fn decide(
        &self,
        system_prompt: &str,
        user_message: &str,
        screenshot_jpeg: Option<&[u8]>,
    ) -> Result<(Value, Usage), LlmClientError> {
        let url = format!("{}/chat/completions", self.endpoint.base_url.trim_end_matches('/'));
        let user_content = match screenshot_jpeg {
            Some(bytes) => UserContent::Parts(vec![
                ContentPart::Text { text: user_message.to_string() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!(
                            "data:image/jpeg;base64,{}",
                            base64::engine::general_purpose::STANDARD.encode(bytes)
                        ),
                    },
                },
            ]),
            None => UserContent::Text(user_message.to_string()),
        };

        let body = ChatCompletionRequest {
            model: self.endpoint.model.clone(),
            temperature: self.sampling.temperature,
            max_tokens: self.sampling.max_output_tokens,
            top_p: self.sampling.top_p,
            frequency_penalty: self.sampling.frequency_penalty,
            presence_penalty: self.sampling.presence_penalty,
            response_format: if screenshot_jpeg.is_none() {
                Some(ResponseFormat { r#type: "json_object".to_string() })
            } else {
                None
            },
            messages: vec![
                ChatMessage { role: "system".to_string(), content: UserContent::Text(system_prompt.to_string()) },
                ChatMessage { role: "user".to_string(), content: user_content },
            ],
        };

        let mut last_err = None;
        for attempt in 1..=MAX_ATTEMPTS {
            match self.attempt(&url, &body).await {
                Ok(value) => return Ok(value),
                Err(LlmClientError::Transient(msg)) if attempt < MAX_ATTEMPTS => {
                    last_err = Some(msg);
                    let delay_ms = BASE_DELAY_MS * 2u64.pow(attempt - 1);
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(other) => return Err(other),
            }
        }
        Err(LlmClientError::Transient(last_err.unwrap_or_else(|| "exhausted retries".to_string())))
    }

    async fn attempt(
        &self,
        url: &str,
        body: &ChatCompletionRequest,
    ) -> Result<(Value, Usage), LlmClientError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.endpoint.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| classify_network_error(&err))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if is_transient_status(status) {
                return Err(LlmClientError::Transient(format!("HTTP {status}: {text}")));
            }
            return Err(LlmClientError::Fatal(format!("HTTP {status}: {text}")));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| LlmClientError::Fatal(format!("invalid response body: {err}")))?;

        let choice = parsed
            .choices
            .first()
            .ok_or_else(|| LlmClientError::Fatal("response had no choices".to_string()))?;

        if choice.finish_reason.as_deref() == Some("length") {
            return Err(LlmClientError::Fatal(
                "response was truncated (finish_reason=length); reduce max_output_tokens demand or raise the token cap".to_string(),
            ));
        }

        let content = choice
            .message
            .content
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_string();
        if content.is_empty() {
            return Err(LlmClientError::Fatal("response content was empty".to_string()));
        }

        let data: Value = serde_json::from_str(&content)
            .map_err(|err| LlmClientError::Fatal(format!("response was not valid JSON: {err}")))?;

        let usage = parsed
            .usage
            .map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        Ok((data, usage))
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status.as_u16() == 429 || status.as_u16() == 408 || status.is_server_error()
}

fn classify_network_error(err: &reqwest::Error) -> LlmClientError {
    let message = err.to_string();
    let lower = message.to_ascii_lowercase();
    if err.is_timeout()
        || err.is_connect()
        || TRANSIENT_NETWORK_MARKERS.iter().any(|m| lower.contains(m))
    {
        LlmClientError::Transient(message)
    } else {
        LlmClientError::Fatal(message)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    r#type: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: UserContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum UserContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
    #[serde(default)]
    usage: Option<ChatCompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ChatCompletionUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_statuses_are_429_408_and_5xx() {
        assert!(is_transient_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient_status(StatusCode::REQUEST_TIMEOUT));
        assert!(is_transient_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_transient_status(StatusCode::BAD_GATEWAY));
        assert!(!is_transient_status(StatusCode::BAD_REQUEST));
        assert!(!is_transient_status(StatusCode::NOT_FOUND));
    }
}

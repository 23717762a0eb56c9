//! `AgentConfig` and `RunOptions` (§3). Construction-time validation lives in
//! the root crate's `config` module; this is the immutable shape itself.

#[cfg(feature = "serde-full")]
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_MAX_ITERATIONS: u32 = 30;
pub const DEFAULT_TOTAL_DEADLINE_MS: u64 = 120_000;
pub const DEFAULT_PER_WAIT_CAP_MS: u64 = 5_000;
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_ACTION_DELAY_MS: u64 = 500;
pub const DEFAULT_JPEG_QUALITY: u8 = 75;
pub const DEFAULT_POOL_SIZE: usize = 3;
pub const DEFAULT_POOL_WAIT_MS: u64 = 30_000;

#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProxyConfig {
    pub server: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CookieSeed {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: Option<String>,
}

#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
}

/// LLM credentials and endpoint; assumed to expose an OpenAI-shaped
/// `/chat/completions` surface (§6).
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LlmEndpoint {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Immutable agent configuration, validated once at construction (§3).
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct AgentConfig {
    pub llm: LlmEndpoint,
    pub sampling: SamplingParams,
    pub max_iterations: u32,
    pub total_deadline_ms: u64,
    pub per_wait_cap_ms: u64,
    pub navigation_timeout_ms: u64,
    pub action_delay_ms: u64,
    pub max_total_tokens: u64,
    pub allow_domains: Vec<String>,
    pub block_domains: Vec<String>,
    pub proxy: Option<ProxyConfig>,
    pub initial_cookies: Vec<CookieSeed>,
    pub extra_headers: Vec<(String, String)>,
    pub vision: bool,
    pub jpeg_quality: u8,
    pub pool_size: usize,
    pub pool_wait_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            llm: LlmEndpoint::default(),
            sampling: SamplingParams {
                temperature: 0.2,
                max_output_tokens: 1024,
                top_p: None,
                frequency_penalty: None,
                presence_penalty: None,
            },
            max_iterations: DEFAULT_MAX_ITERATIONS,
            total_deadline_ms: DEFAULT_TOTAL_DEADLINE_MS,
            per_wait_cap_ms: DEFAULT_PER_WAIT_CAP_MS,
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            action_delay_ms: DEFAULT_ACTION_DELAY_MS,
            max_total_tokens: 0,
            allow_domains: Vec::new(),
            block_domains: Vec::new(),
            proxy: None,
            initial_cookies: Vec::new(),
            extra_headers: Vec::new(),
            vision: false,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            pool_size: DEFAULT_POOL_SIZE,
            pool_wait_ms: DEFAULT_POOL_WAIT_MS,
        }
    }
}

/// An opaque validator+description pair for a caller-supplied output schema.
/// The description is interpolated into the prompt (§4.5); the validator is
/// applied to the model's `done.result` by the caller, outside the loop.
#[derive(Clone)]
pub struct OutputSchema {
    pub description: String,
    pub validate: Arc<dyn Fn(&str) -> Result<(), String> + Send + Sync>,
}

impl std::fmt::Debug for OutputSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSchema")
            .field("description", &self.description)
            .finish()
    }
}

/// Per-run overrides and the one-shot inputs for a task (§3).
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub url: String,
    pub prompt: String,
    pub max_iterations: Option<u32>,
    pub total_deadline_ms: Option<u64>,
    pub action_delay_ms: Option<u64>,
    pub vision: Option<bool>,
    pub output_schema: Option<OutputSchema>,
    /// Polled at the top of each interactive-loop iteration and before the
    /// static loop's single LLM call (§5 "Cancellation and timeouts").
    pub cancellation: Option<CancellationToken>,
}

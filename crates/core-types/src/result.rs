//! Terminal result and accounting types (§3).

#[cfg(feature = "serde-full")]
use serde::{Deserialize, Serialize};

use crate::action::AgentAction;

#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunStatus {
    Done,
    MaxIterations,
    Error,
    Timeout,
    Aborted,
}

#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tier {
    Http,
    Playwright,
}

#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ActionRecord {
    pub action: AgentAction,
    pub iteration: u32,
    pub timestamp_ms: u64,
}

/// Cumulative, monotonic LLM token accounting.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LlmUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub calls: u32,
}

impl LlmUsage {
    pub fn add(&mut self, prompt: u64, completion: u64, total: u64) {
        self.prompt_tokens += prompt;
        self.completion_tokens += completion;
        self.total_tokens += total;
        self.calls += 1;
    }
}

/// Peak resource usage observed over the life of a run.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MemoryUsage {
    pub peak_browser_rss_kb: Option<u64>,
    pub node_heap_mb: Option<f64>,
}

/// Either an opaque string or structured JSON, matching `done.result`'s
/// shape when an output schema is attached.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-full", serde(untagged))]
#[derive(Clone, Debug, PartialEq)]
pub enum ResultData {
    Text(String),
    Structured(serde_json::Value),
}

/// The terminal, immutable outcome of a run (§3).
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct AgentResult {
    pub status: RunStatus,
    pub tier: Tier,
    pub data: Option<ResultData>,
    pub report: String,
    pub duration_ms: u64,
    pub actions: Vec<ActionRecord>,
    pub usage: LlmUsage,
    pub memory: MemoryUsage,
    pub error: Option<String>,
}

pub const MAX_RESULT_DATA_CHARS: usize = 10_000;

/// Truncate oversized result text for the rendered report (§4.11).
pub fn truncate_for_report(data: &str) -> String {
    if data.chars().count() > MAX_RESULT_DATA_CHARS {
        let mut truncated: String = data.chars().take(MAX_RESULT_DATA_CHARS).collect();
        truncated.push_str("\u{2026} (truncated)");
        truncated
    } else {
        data.to_string()
    }
}

//! Static Loop (C9, §4.7): a single-shot resolution attempt against raw
//! HTML the orchestrator has already fetched, with no browser involved.

use auspex_core_types::{AgentAction, AgentConfig, LlmUsage, ResultData};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::report::describe_action;

const FALLBACK_MESSAGE: &str = "please try the browser path";

/// What the static loop decided, beyond the usage it always reports.
pub enum StaticOutcome {
    /// The LLM resolved the task in one shot; carries the done action's
    /// description for history/report purposes.
    Done { data: ResultData, description: String },
    /// A terminal failure surfaced via `done{result:"FAILED: ..."}`.
    Failed(String),
    /// The task needs the full interactive loop — a browser-only action was
    /// requested, the LLM call failed, or the response didn't parse.
    Escalate,
}

pub struct StaticLoopOutput {
    pub outcome: StaticOutcome,
    pub usage: LlmUsage,
}

/// Attempt the task in exactly one LLM call (§4.7). `html` and `final_url`
/// are whatever the caller's tier-1 fetch already produced — this function
/// does no network I/O of its own beyond the LLM call.
pub async fn run_static_loop(
    config: &AgentConfig,
    cancellation: Option<&CancellationToken>,
    prompt: &str,
    html: &str,
    final_url: &str,
) -> StaticLoopOutput {
    if cancellation.is_some_and(|c| c.is_cancelled()) {
        return StaticLoopOutput { outcome: StaticOutcome::Escalate, usage: LlmUsage::default() };
    }

    let snapshot = auspex_snapshot_builder::build_static_snapshot(html, final_url);
    let snapshot_text = auspex_snapshot_builder::format_snapshot(&snapshot);

    let vision_available =
        auspex_llm_client::check_vision_availability(&config.llm.model, config.vision) && config.vision;
    let system_prompt = auspex_llm_client::build_system_prompt(vision_available);
    let user_message = auspex_llm_client::build_user_message(prompt, &snapshot_text, None, None);

    let client = auspex_llm_client::LlmClient::new(config.llm.clone(), config.sampling.clone());
    let (data, usage) = match client.decide(&system_prompt, &user_message, None).await {
        Ok((data, usage)) => (data, usage),
        Err(e) => {
            debug!(error = %e, "static loop's single LLM call failed, escalating");
            return StaticLoopOutput {
                outcome: StaticOutcome::Escalate,
                usage: LlmUsage::default(),
            };
        }
    };
    let mut total_usage = LlmUsage::default();
    total_usage.add(usage.prompt_tokens, usage.completion_tokens, usage.total_tokens);

    let action = match auspex_action_schema::parse(&data) {
        Ok(action) => action,
        Err(e) => {
            debug!(error = %e, "static loop's action failed to parse, escalating");
            return StaticLoopOutput { outcome: StaticOutcome::Escalate, usage: total_usage };
        }
    };

    match action {
        AgentAction::Done { result } => {
            if let Some(tail) = result.strip_prefix("FAILED:") {
                let message = tail.trim();
                let message = if message.is_empty() { FALLBACK_MESSAGE } else { message };
                StaticLoopOutput {
                    outcome: StaticOutcome::Failed(message.to_string()),
                    usage: total_usage,
                }
            } else {
                let description = describe_action(&AgentAction::Done { result: result.clone() });
                StaticLoopOutput {
                    outcome: StaticOutcome::Done { data: ResultData::Text(result), description },
                    usage: total_usage,
                }
            }
        }
        _ => StaticLoopOutput { outcome: StaticOutcome::Escalate, usage: total_usage },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_message_is_non_empty() {
        assert!(!FALLBACK_MESSAGE.is_empty());
    }
}

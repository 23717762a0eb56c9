//! Interactive Loop (C8, §4.6) — the heart of the agent. Drives a single
//! browser page through repeated snapshot → decide → act iterations, with
//! every guard the spec calls for: cancellation, deadline, token budget,
//! blocked-page detection, loop detection, and vision escalation.
//!
//! The loop is inherently cooperative and single-threaded (§9): ordering,
//! budget, and history guarantees all depend on running one iteration to
//! completion before starting the next.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use auspex_action_schema::action_key;
use auspex_cdp_adapter::DriverPage;
use auspex_core_types::{
    AgentAction, AgentConfig, ActionRecord, LlmUsage, MemoryUsage, ResultData, RunStatus,
};
use auspex_url_safety::AllowBlockPolicy;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::executor;
use crate::observer::{Observer, ObserverEvent};
use crate::report::describe_action;
use crate::report::RunLogWriter;

const HISTORY_WINDOW: usize = 8;
const RECENT_WINDOW: usize = 9;
const MAX_OCCURRENCES: usize = 3;
const VISION_ESCALATION_THRESHOLD: u32 = 3;
const BLOCKED_PAGE_SAMPLE_SIZE: usize = 200_000;

/// Fixed per-run parameters the loop does not mutate.
pub struct InteractiveLoopParams<'a> {
    pub page: &'a DriverPage,
    pub config: &'a AgentConfig,
    pub policy: &'a AllowBlockPolicy,
    pub prompt: &'a str,
    pub max_iterations: u32,
    pub total_deadline: Duration,
    pub action_delay: Duration,
    pub vision_available: bool,
    pub cancellation: Option<&'a CancellationToken>,
}

pub struct InteractiveLoopOutput {
    pub status: RunStatus,
    pub data: Option<ResultData>,
    pub actions: Vec<ActionRecord>,
    pub usage: LlmUsage,
    pub memory: MemoryUsage,
    pub error: Option<String>,
}

/// Runs the perception-decision-action iteration until a terminal action,
/// a guard trips, or `max_iterations` is exhausted (§4.6).
pub async fn run_interactive_loop(
    params: InteractiveLoopParams<'_>,
    memory_sample: Option<&(dyn Fn() -> Option<u64> + Sync)>,
    observer: &mut dyn Observer,
    mut run_log: Option<&mut RunLogWriter>,
) -> InteractiveLoopOutput {
    let start = Instant::now();
    let client = auspex_llm_client::LlmClient::new(params.config.llm.clone(), params.config.sampling.clone());

    let mut usage = LlmUsage::default();
    let mut memory = MemoryUsage::default();
    let mut history: Vec<String> = Vec::new();
    let mut actions: Vec<ActionRecord> = Vec::new();
    let mut recent_keys: VecDeque<String> = VecDeque::with_capacity(RECENT_WINDOW);
    let mut consecutive_failures: u32 = 0;
    let mut vision_active = false;

    for iteration in 0..params.max_iterations {
        // 1. Cancellation check.
        if params.cancellation.is_some_and(|c| c.is_cancelled()) {
            return terminal(RunStatus::Aborted, None, actions, usage, memory, None);
        }

        // 2. Memory sample.
        if let Some(sample) = memory_sample {
            if let Some(rss) = sample() {
                memory.peak_browser_rss_kb =
                    Some(memory.peak_browser_rss_kb.map_or(rss, |peak| peak.max(rss)));
            }
        }

        // 3. Deadline check.
        if start.elapsed() > params.total_deadline {
            return terminal(RunStatus::Timeout, None, actions, usage, memory, None);
        }

        // 4. Budget check.
        if params.config.max_total_tokens > 0 && usage.total_tokens >= params.config.max_total_tokens {
            return terminal(
                RunStatus::Error,
                None,
                actions,
                usage,
                memory,
                Some("Token budget exceeded".to_string()),
            );
        }

        // 5. Snapshot.
        let snapshot = auspex_snapshot_builder::build_live_snapshot(params.page, false).await;
        observer.on_event(ObserverEvent::Iteration { index: iteration, url: &snapshot.url });
        if let Some(log) = run_log.as_deref_mut() {
            log.log_iteration(iteration, &snapshot.url).await;
            log.log_snapshot_meta(&snapshot.title, snapshot.text.len(), snapshot.links.len(), snapshot.forms.len())
                .await;
        }

        // 6. Blocked-page detection.
        let full_html = params.page.content().await.unwrap_or_default();
        let sample_html = if full_html.len() > BLOCKED_PAGE_SAMPLE_SIZE {
            &full_html[..BLOCKED_PAGE_SAMPLE_SIZE]
        } else {
            full_html.as_str()
        };
        if auspex_content_extractor::is_blocked_page(&snapshot.url, sample_html) {
            return terminal(
                RunStatus::Error,
                None,
                actions,
                usage,
                memory,
                Some("Blocked by target site".to_string()),
            );
        }

        // 7. Optional screenshot.
        let screenshot = if vision_active {
            match params.page.screenshot(params.config.jpeg_quality).await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!(error = %e, "screenshot capture failed, continuing without vision this turn");
                    None
                }
            }
        } else {
            None
        };

        // 8. History window: first line plus the most recent 7 when over 8.
        let windowed_history = window_history(&history);
        let snapshot_text = auspex_snapshot_builder::format_snapshot(&snapshot);
        let system_prompt = auspex_llm_client::build_system_prompt(vision_active);
        let user_message =
            auspex_llm_client::build_user_message(params.prompt, &snapshot_text, None, Some(&windowed_history));

        // 9. LLM decision.
        let decision = client.decide(&system_prompt, &user_message, screenshot.as_deref()).await;
        let (data, call_usage) = match decision {
            Ok(pair) => pair,
            Err(e) => {
                return terminal(
                    RunStatus::Error,
                    None,
                    actions,
                    usage,
                    memory,
                    Some(e.to_string()),
                );
            }
        };
        usage.add(call_usage.prompt_tokens, call_usage.completion_tokens, call_usage.total_tokens);

        // 10. Action parsing.
        let action = match auspex_action_schema::parse(&data) {
            Ok(action) => action,
            Err(e) => {
                consecutive_failures += 1;
                history.push(format!(
                    "[{iteration}] INVALID ACTION: {e}. Use shorter, simpler CSS selectors, or a role=... locator."
                ));
                maybe_escalate_vision(
                    params.vision_available,
                    consecutive_failures,
                    &mut vision_active,
                    &mut history,
                    iteration,
                );
                continue;
            }
        };

        // 11. Loop detection.
        let key = action_key(&action);
        let existing = recent_keys.iter().filter(|k| **k == key).count();
        if existing + 1 >= MAX_OCCURRENCES {
            consecutive_failures += 1;
            history.push(format!(
                "[{iteration}] STUCK: the same action was attempted {MAX_OCCURRENCES} times in a row. \
                 Try a completely different approach — a different selector, a different link, or scrolling first."
            ));
            recent_keys.clear();
            maybe_escalate_vision(
                params.vision_available,
                consecutive_failures,
                &mut vision_active,
                &mut history,
                iteration,
            );
            continue;
        }
        recent_keys.push_back(key);
        if recent_keys.len() > RECENT_WINDOW {
            recent_keys.pop_front();
        }

        // 12. Record the action.
        let record = ActionRecord {
            action: action.clone(),
            iteration,
            timestamp_ms: start.elapsed().as_millis() as u64,
        };
        observer.on_event(ObserverEvent::Action(&record));
        let description = describe_action(&action);
        if let Some(log) = run_log.as_deref_mut() {
            log.log_action(iteration, &description).await;
        }
        actions.push(record);

        // 13. done dispatch.
        if let AgentAction::Done { result } = &action {
            if let Some(tail) = result.strip_prefix("FAILED:") {
                let message = tail.trim();
                let message = if message.is_empty() { "action reported failure" } else { message };
                return terminal(RunStatus::Error, None, actions, usage, memory, Some(message.to_string()));
            }
            return terminal(
                RunStatus::Done,
                Some(ResultData::Text(result.clone())),
                actions,
                usage,
                memory,
                None,
            );
        }

        // 14. Execute.
        match executor::execute(params.page, &action, params.policy).await {
            Ok(()) => {
                history.push(format!("[{iteration}] {description} -> OK"));
                consecutive_failures = 0;
                if let Some(log) = run_log.as_deref_mut() {
                    log.log_action_result(iteration, Ok(())).await;
                }
            }
            Err(e) => {
                consecutive_failures += 1;
                history.push(format!(
                    "[{iteration}] ERROR executing {}: {e}. Try a different approach.",
                    action.kind()
                ));
                if let Some(log) = run_log.as_deref_mut() {
                    log.log_action_result(iteration, Err(&e.to_string())).await;
                }
                maybe_escalate_vision(
                    params.vision_available,
                    consecutive_failures,
                    &mut vision_active,
                    &mut history,
                    iteration,
                );
                continue;
            }
        }

        // 15. Inter-iteration delay (self-timed actions skip it).
        if !action.is_self_timed() {
            tokio::time::sleep(params.action_delay).await;
        }
    }

    info!(iterations = params.max_iterations, "interactive loop exhausted max_iterations without a terminal action");
    terminal(RunStatus::MaxIterations, None, actions, usage, memory, None)
}

fn terminal(
    status: RunStatus,
    data: Option<ResultData>,
    actions: Vec<ActionRecord>,
    usage: LlmUsage,
    memory: MemoryUsage,
    error: Option<String>,
) -> InteractiveLoopOutput {
    InteractiveLoopOutput { status, data, actions, usage, memory, error }
}

/// Keep the first history line plus the most recent 7 once the history
/// exceeds `HISTORY_WINDOW` entries — preserves initial context while
/// capping the tokens spent on it (§4.6 step 8).
fn window_history(history: &[String]) -> Vec<String> {
    if history.len() <= HISTORY_WINDOW {
        return history.to_vec();
    }
    let mut windowed = Vec::with_capacity(HISTORY_WINDOW);
    windowed.push(history[0].clone());
    windowed.extend(history[history.len() - 7..].iter().cloned());
    windowed
}

/// Vision is available only when configured and model-whitelisted; it
/// activates the first time consecutive failures cross the threshold, and
/// stays on for the rest of the run (§4.6 "Vision escalation").
fn maybe_escalate_vision(
    vision_available: bool,
    consecutive_failures: u32,
    vision_active: &mut bool,
    history: &mut Vec<String>,
    iteration: u32,
) {
    if *vision_active || !vision_available {
        return;
    }
    if consecutive_failures >= VISION_ESCALATION_THRESHOLD {
        *vision_active = true;
        history.push(format!(
            "[{iteration}] Vision escalation: attaching a screenshot to subsequent turns after repeated failures."
        ));
        debug!(iteration, "vision escalated after repeated consecutive failures");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_window_keeps_first_line_and_last_seven() {
        let history: Vec<String> = (0..10).map(|i| format!("line {i}")).collect();
        let windowed = window_history(&history);
        assert_eq!(windowed.len(), HISTORY_WINDOW);
        assert_eq!(windowed[0], "line 0");
        assert_eq!(windowed.last().unwrap(), "line 9");
    }

    #[test]
    fn history_under_the_cap_is_unchanged() {
        let history: Vec<String> = (0..5).map(|i| format!("line {i}")).collect();
        assert_eq!(window_history(&history), history);
    }

    #[test]
    fn vision_escalates_only_after_three_failures_when_available() {
        let mut active = false;
        let mut history = Vec::new();
        maybe_escalate_vision(true, 2, &mut active, &mut history, 2);
        assert!(!active);
        maybe_escalate_vision(true, 3, &mut active, &mut history, 3);
        assert!(active);
        assert!(history.iter().any(|l| l.contains("Vision escalation")));
    }

    #[test]
    fn vision_never_escalates_when_unavailable() {
        let mut active = false;
        let mut history = Vec::new();
        maybe_escalate_vision(false, 10, &mut active, &mut history, 5);
        assert!(!active);
    }
}

//! Action Executor (C12, §4.10): translates a validated `AgentAction` into
//! browser driver calls, with the fixed per-action timeouts the table
//! specifies.

use std::time::Duration;

use auspex_action_schema::{is_role_selector, parse_role_selector};
use auspex_cdp_adapter::{AdapterError, DriverPage};
use auspex_core_types::{AgentAction, ScrollDirection, Selector};
use auspex_url_safety::AllowBlockPolicy;
use thiserror::Error;
use tracing::debug;

const CLICK_TIMEOUT: Duration = Duration::from_millis(10_000);
const FILL_TIMEOUT: Duration = Duration::from_millis(5_000);
const SELECT_TIMEOUT: Duration = Duration::from_millis(5_000);
const HOVER_TIMEOUT: Duration = Duration::from_millis(5_000);
const GOTO_TIMEOUT: Duration = Duration::from_millis(30_000);
const POST_ACTION_SETTLE: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error(transparent)]
    Driver(#[from] AdapterError),
    #[error("goto target rejected: {0}")]
    UrlRejected(String),
}

/// Execute one validated action against a live page (§4.10). `goto` targets
/// are re-validated through C1 here, since the allow/block policy is a
/// runtime parameter unavailable at parse time.
pub async fn execute(
    page: &DriverPage,
    action: &AgentAction,
    policy: &AllowBlockPolicy,
) -> Result<(), ExecutorError> {
    match action {
        AgentAction::Click { selector } => {
            let resolved = resolve_selector(page, selector, CLICK_TIMEOUT).await?;
            page.click(&resolved, CLICK_TIMEOUT).await?;
            let _ = page.wait_for_load_state(POST_ACTION_SETTLE).await;
            Ok(())
        }
        AgentAction::Hover { selector } => {
            let resolved = resolve_selector(page, selector, HOVER_TIMEOUT).await?;
            page.hover(&resolved, HOVER_TIMEOUT).await?;
            Ok(())
        }
        AgentAction::Type { selector, text } => {
            let resolved = resolve_selector(page, selector, FILL_TIMEOUT).await?;
            page.fill(&resolved, text, FILL_TIMEOUT).await?;
            Ok(())
        }
        AgentAction::Select { selector, value } => {
            let resolved = resolve_selector(page, selector, SELECT_TIMEOUT).await?;
            page.select_option(&resolved, value, SELECT_TIMEOUT).await?;
            Ok(())
        }
        AgentAction::PressKey { key } => {
            page.press_key(key.as_str()).await?;
            if key.as_str().eq_ignore_ascii_case("enter") {
                let _ = page.wait_for_load_state(POST_ACTION_SETTLE).await;
            }
            Ok(())
        }
        AgentAction::Goto { url } => {
            let canonical = auspex_url_safety::validate(url, policy)
                .await
                .map_err(|e| ExecutorError::UrlRejected(e.to_string()))?;
            page.goto(&canonical, GOTO_TIMEOUT).await?;
            Ok(())
        }
        AgentAction::Wait { ms } => {
            page.wait_for_timeout(Duration::from_millis(*ms as u64)).await;
            Ok(())
        }
        AgentAction::Scroll { direction, amount } => {
            let amount = amount.unwrap_or_else(auspex_action_schema::default_scroll_amount);
            let delta = match direction {
                ScrollDirection::Down => amount as i64,
                ScrollDirection::Up => -(amount as i64),
            };
            page.evaluate(&format!("window.scrollBy(0, {delta})")).await?;
            Ok(())
        }
        AgentAction::Done { .. } => {
            debug!("done action reached the executor; the loop should have terminated already");
            Ok(())
        }
    }
}

/// If `selector` is a `role=...` locator, resolve it to a concrete CSS
/// selector via the browser's role-locator support; otherwise pass it
/// through unchanged (§4.10 "Role-locator parsing").
async fn resolve_selector(
    page: &DriverPage,
    selector: &Selector,
    timeout: Duration,
) -> Result<String, ExecutorError> {
    let raw = selector.as_str();
    if !is_role_selector(raw) {
        return Ok(raw.to_string());
    }
    let (role, name) = parse_role_selector(raw)
        .ok_or_else(|| ExecutorError::Driver(AdapterError::ElementNotFound(raw.to_string())))?;
    let resolved = page
        .resolve_role_locator(&role, name.as_deref(), timeout)
        .await?;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_css_selector_is_not_a_role_selector() {
        assert!(!is_role_selector("#submit"));
    }
}

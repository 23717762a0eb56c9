//! Tier 3 ("browser"): a launch-once-reuse Chromium instance driving real
//! page rendering, anti-fingerprinting, resource/tracker blocking, dialog
//! auto-dismissal, and a human-like scroll pass before extraction (§4.9
//! Tier 3).

use std::sync::Arc;
use std::time::Duration;

use auspex_content_extractor::extract;
use auspex_core_types::CookieSeed;
use auspex_stealth::launch::{anti_automation_args, ContextFingerprint, VIEWPORT};
use auspex_stealth::{is_tracker_url, ABORTED_RESOURCE_TYPES, STEALTH_INIT_SCRIPT};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams as FetchEnableParams, EventRequestPaused, FailRequestParams,
};
use chromiumoxide::cdp::browser_protocol::network::{
    CookieParam, EventResponseReceived, GetResponseBodyParams, SetCookiesParams,
};
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, EventJavascriptDialogOpening,
    HandleJavaScriptDialogParams,
};
use chromiumoxide::error::CdpError;
use futures::StreamExt;
use rand::Rng;
use serde_json::Value;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

use crate::{ScrapeOutcome, ScrapeTier, TierFailure};

const NAV_TIMEOUT: Duration = Duration::from_secs(30);
const NAV_RETRY_DELAY: Duration = Duration::from_millis(1_500);
const SELECTOR_WAIT: Duration = Duration::from_secs(10);
const MAX_JSON_RESPONSE_BYTES: u64 = 500_000;

/// Per-scrape tier-3 options the orchestrator (C11) and the caller
/// configure (§4.9 Tier 3).
#[derive(Clone, Debug, Default)]
pub struct BrowserTierOptions {
    pub proxy: Option<String>,
    pub cookies: Vec<CookieSeed>,
    pub wait_for_selector: Option<String>,
    pub record_json_responses: bool,
}

/// Owns the launch-once-reuse Chromium process. Cheap to clone; cloning
/// shares the underlying browser.
#[derive(Clone)]
pub struct BrowserTier {
    inner: Arc<AsyncMutex<Option<Browser>>>,
    headless: bool,
}

impl BrowserTier {
    pub fn new(headless: bool) -> Self {
        Self {
            inner: Arc::new(AsyncMutex::new(None)),
            headless,
        }
    }

    async fn browser(&self) -> Result<Browser, TierFailure> {
        let mut guard = self.inner.lock().await;
        if guard.is_none() {
            let fingerprint = ContextFingerprint::default();
            let mut builder = BrowserConfig::builder()
                .headless(self.headless)
                .window_size(VIEWPORT.0, VIEWPORT.1)
                .user_agent(&fingerprint.user_agent);
            for arg in anti_automation_args() {
                builder = builder.arg(arg);
            }
            let config = builder
                .build()
                .map_err(|e| fail(format!("browser config: {e}")))?;
            let (browser, mut handler) = Browser::launch(config)
                .await
                .map_err(|e| fail(format!("launch failed: {e}")))?;
            tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if let Err(e) = event {
                        warn!(error = %e, "chromium event stream error (tier 3)");
                    }
                }
                debug!("tier-3 chromium event stream closed");
            });
            *guard = Some(browser);
        }
        Ok(guard.as_ref().expect("just populated").clone())
    }

    pub async fn fetch(
        &self,
        url: &str,
        main_only: bool,
        timeout: Duration,
        opts: &BrowserTierOptions,
    ) -> Result<ScrapeOutcome, TierFailure> {
        let browser = self.browser().await?;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| fail(format!("new page: {e}")))?;

        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
            STEALTH_INIT_SCRIPT.to_string(),
        ))
        .await
        .map_err(|e| fail(format!("stealth script injection failed: {e}")))?;

        if !opts.cookies.is_empty() {
            let cookies: Vec<CookieParam> = opts
                .cookies
                .iter()
                .map(|c| {
                    let mut param = CookieParam::new(c.name.clone(), c.value.clone());
                    param.domain = Some(c.domain.clone());
                    param.path = c.path.clone();
                    param
                })
                .collect();
            if let Err(e) = page.execute(SetCookiesParams::new(cookies)).await {
                warn!(error = %e, "failed to seed cookies (tier 3)");
            }
        }

        install_route_interception(&page).await;
        install_dialog_autodismiss(&page);
        let recorded_json = if opts.record_json_responses {
            Some(install_json_response_recorder(&page).await)
        } else {
            None
        };

        if let Err(e) = navigate_with_retry(&page, url).await {
            return Err(fail(format!("navigation failed: {e}")));
        }

        let idle_cap = Duration::from_secs(15).min(timeout / 2);
        let _ = wait_for_network_idle(&page, idle_cap).await;

        if let Some(selector) = &opts.wait_for_selector {
            let _ = tokio::time::timeout(SELECTOR_WAIT, async {
                loop {
                    if page.find_element(selector).await.is_ok() {
                        return;
                    }
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            })
            .await;
        }

        simulate_human_scroll(&page).await;

        let html = page
            .content()
            .await
            .map_err(|e| fail(format!("content read failed: {e}")))?;
        let final_url = page
            .url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| url.to_string());

        let mut extracted = extract(&html, main_only, &final_url)
            .map_err(|e| fail(format!("extraction failed: {e}")))?;
        if let Some(handle) = recorded_json {
            if let Some(bodies) = handle.take() {
                attach_recorded_json(&mut extracted, bodies);
            }
        }

        let _ = page.close().await;

        Ok(ScrapeOutcome {
            tier: ScrapeTier::Browser,
            status_code: 200,
            final_url,
            content: extracted,
        })
    }

    pub async fn shutdown(&self) {
        if let Some(browser) = self.inner.lock().await.take() {
            let mut browser = browser;
            let _ = browser.close().await;
        }
    }
}

async fn navigate_with_retry(page: &chromiumoxide::Page, url: &str) -> Result<(), CdpError> {
    match tokio::time::timeout(NAV_TIMEOUT, page.goto(url)).await {
        Ok(Ok(_)) => Ok(()),
        _ => {
            tokio::time::sleep(NAV_RETRY_DELAY).await;
            tokio::time::timeout(NAV_TIMEOUT, page.goto(url))
                .await
                .unwrap_or_else(|_| Err(CdpError::Timeout))
                .map(|_| ())
        }
    }
}

/// Best-effort `networkidle` stand-in: polls `document.readyState` until it
/// reports `complete`, capped at `cap` (§4.9 Tier 3 — "wait for networkidle
/// capped at 15s, or 50% of the user's timeout").
async fn wait_for_network_idle(page: &chromiumoxide::Page, cap: Duration) -> Result<(), ()> {
    tokio::time::timeout(cap, async {
        loop {
            if let Ok(result) = page.evaluate("document.readyState").await {
                if result.into_value::<String>().ok().as_deref() == Some("complete") {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
    })
    .await
    .map_err(|_| ())
}

/// Aborts a fixed resource-type/tracker-URL set via the Fetch domain so the
/// page loads faster and with a smaller fingerprint surface (§4.9 Tier 3).
async fn install_route_interception(page: &chromiumoxide::Page) {
    if let Err(e) = page.execute(FetchEnableParams::default()).await {
        warn!(error = %e, "failed to enable Fetch domain (tier 3)");
        return;
    }
    let Ok(mut events) = page.event_listener::<EventRequestPaused>().await else {
        return;
    };
    let page = page.clone();
    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let blocked = event
                .resource_type
                .as_ref()
                .map(|t| ABORTED_RESOURCE_TYPES.contains(&t.as_ref().to_lowercase().as_str()))
                .unwrap_or(false)
                || is_tracker_url(&event.request.url);

            let result = if blocked {
                page.execute(FailRequestParams::new(
                    event.request_id.clone(),
                    chromiumoxide::cdp::browser_protocol::network::ErrorReason::BlockedByClient,
                ))
                .await
                .map(|_| ())
            } else {
                page.execute(ContinueRequestParams::new(event.request_id.clone()))
                    .await
                    .map(|_| ())
            };
            if let Err(e) = result {
                debug!(error = %e, "route interception response failed");
            }
        }
    });
}

fn install_dialog_autodismiss(page: &chromiumoxide::Page) {
    let page = page.clone();
    tokio::spawn(async move {
        let Ok(mut events) = page.event_listener::<EventJavascriptDialogOpening>().await else {
            return;
        };
        while events.next().await.is_some() {
            if let Err(e) = page
                .execute(HandleJavaScriptDialogParams::new(false))
                .await
            {
                debug!(error = %e, "dialog dismissal failed");
            }
        }
    });
}

type RecordedJson = Arc<AsyncMutex<Vec<(String, Value)>>>;

struct JsonRecorderHandle(RecordedJson);

impl JsonRecorderHandle {
    fn take(self) -> Option<Vec<(String, Value)>> {
        Arc::try_unwrap(self.0).ok().map(|m| m.into_inner())
    }
}

/// Records intercepted JSON API responses under the size cap (§4.9 Tier 3).
async fn install_json_response_recorder(page: &chromiumoxide::Page) -> JsonRecorderHandle {
    let store: RecordedJson = Arc::new(AsyncMutex::new(Vec::new()));
    let Ok(mut events) = page.event_listener::<EventResponseReceived>().await else {
        return JsonRecorderHandle(store);
    };
    let page = page.clone();
    let store_task = store.clone();
    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let content_type = event
                .response
                .mime_type
                .to_ascii_lowercase();
            if !content_type.contains("application/json") {
                continue;
            }
            let url = event.response.url.clone();
            if is_asset_url(&url) {
                continue;
            }
            if let Some(len) = event.response.encoded_data_length {
                if len as u64 > MAX_JSON_RESPONSE_BYTES {
                    continue;
                }
            }
            if let Ok(body) = page
                .execute(GetResponseBodyParams::new(event.request_id.clone()))
                .await
            {
                if let Ok(value) = serde_json::from_str::<Value>(&body.body) {
                    store_task.lock().await.push((url, value));
                }
            }
        }
    });
    JsonRecorderHandle(store)
}

fn is_asset_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    [".png", ".jpg", ".jpeg", ".gif", ".svg", ".css", ".woff", ".woff2"]
        .iter()
        .any(|ext| lower.ends_with(ext))
}

fn attach_recorded_json(
    content: &mut auspex_content_extractor::ExtractedContent,
    bodies: Vec<(String, Value)>,
) {
    if bodies.is_empty() {
        return;
    }
    if content.ssr_data.is_none() {
        content.ssr_framework = Some("intercepted-api".to_string());
        content.ssr_data = Some(Value::Array(
            bodies
                .into_iter()
                .map(|(url, body)| serde_json::json!({ "url": url, "body": body }))
                .collect(),
        ));
    }
}

/// Steps down the page in `total_height / 6` increments (min 300px) at
/// 120-250ms intervals, then jumps back to the top (§4.9 Tier 3).
async fn simulate_human_scroll(page: &chromiumoxide::Page) {
    let delays: Vec<u64> = (0..6)
        .map(|_| rand::thread_rng().gen_range(120..=250))
        .collect();
    let delays_json = serde_json::to_string(&delays).unwrap_or_else(|_| "[150]".to_string());
    let script = format!(
        r#"(async () => {{
            const delays = {delays_json};
            const totalHeight = document.body.scrollHeight;
            const step = Math.max(300, Math.floor(totalHeight / 6));
            let scrolled = 0;
            let i = 0;
            while (scrolled < totalHeight) {{
                window.scrollBy(0, step);
                scrolled += step;
                await new Promise(r => setTimeout(r, delays[i % delays.length]));
                i += 1;
            }}
            window.scrollTo(0, 0);
            return true;
        }})()"#
    );
    if let Err(e) = page.evaluate(script).await {
        debug!(error = %e, "human scroll simulation failed (non-fatal)");
    }
}

fn fail(reason: String) -> TierFailure {
    TierFailure {
        tier: ScrapeTier::Browser,
        reason,
    }
}

//! A thin, typed wrapper over `chromiumoxide::Page` exposing exactly the
//! operations the action executor (C12) and snapshot builder (C3) need —
//! the "assumed browser driver contract" the higher layers are built
//! against.

use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::accessibility::GetFullAxTreeParams;
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::cdp::browser_protocol::page::ScreenshotFormat as CdpScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::AdapterError;

/// Launch-time configuration. Mirrors the subset of `AgentConfig` that
/// affects the underlying Chromium process rather than page behavior.
#[derive(Clone, Debug, Default)]
pub struct LaunchConfig {
    pub headless: bool,
    pub executable: Option<PathBuf>,
    pub proxy: Option<String>,
    pub user_agent: Option<String>,
}

/// An owned Chromium instance plus the background task pumping its CDP
/// event stream. Dropping this without calling [`ChromeDriver::close`]
/// leaves the browser process running — callers (the browser pool) are
/// expected to always close on teardown.
pub struct ChromeDriver {
    browser: Browser,
    handler: Option<JoinHandle<()>>,
}

impl ChromeDriver {
    pub async fn launch(config: LaunchConfig) -> Result<Self, AdapterError> {
        let mut builder = BrowserConfig::builder().headless(config.headless);
        if let Some(executable) = config.executable {
            builder = builder.chrome_executable(executable);
        }
        if let Some(proxy) = &config.proxy {
            builder = builder.arg(format!("--proxy-server={proxy}"));
        }
        if let Some(ua) = &config.user_agent {
            builder = builder.user_agent(ua);
        }
        let browser_config = builder
            .build()
            .map_err(|e| AdapterError::Launch(e.to_string()))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| AdapterError::Launch(e.to_string()))?;

        let join = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!(error = %e, "chromium event stream error");
                }
            }
            debug!("chromium event stream closed");
        });

        Ok(Self {
            browser,
            handler: Some(join),
        })
    }

    pub async fn new_page(&self) -> Result<DriverPage, AdapterError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| AdapterError::Navigation(e.to_string()))?;
        Ok(DriverPage { page })
    }

    pub async fn close(mut self) -> Result<(), AdapterError> {
        let _ = self.browser.close().await;
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        Ok(())
    }

    /// True once the underlying Chromium process has exited — the pool
    /// polls this to decide whether to discard and relaunch.
    pub fn is_disconnected(&self) -> bool {
        self.handler
            .as_ref()
            .map(|h| h.is_finished())
            .unwrap_or(true)
    }
}

/// A single tab. Every operation takes its own deadline rather than relying
/// on a shared default, matching §4.10's per-action timeout model.
pub struct DriverPage {
    page: Page,
}

impl DriverPage {
    pub async fn goto(&self, url: &str, timeout: Duration) -> Result<(), AdapterError> {
        tokio::time::timeout(timeout, async {
            self.page
                .goto(url)
                .await
                .map_err(|e| AdapterError::Navigation(e.to_string()))?;
            self.page
                .wait_for_navigation()
                .await
                .map_err(|e| AdapterError::Navigation(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(|_| AdapterError::Timeout(format!("goto {url}")))?
    }

    pub async fn url(&self) -> Result<String, AdapterError> {
        self.page
            .url()
            .await
            .map_err(|e| AdapterError::Evaluate(e.to_string()))?
            .ok_or_else(|| AdapterError::Evaluate("page has no url".into()))
    }

    pub async fn title(&self) -> Result<Option<String>, AdapterError> {
        self.page
            .get_title()
            .await
            .map_err(|e| AdapterError::Evaluate(e.to_string()))
    }

    pub async fn content(&self) -> Result<String, AdapterError> {
        self.page
            .content()
            .await
            .map_err(|e| AdapterError::Evaluate(e.to_string()))
    }

    pub async fn evaluate(&self, expression: &str) -> Result<Value, AdapterError> {
        let result = self
            .page
            .evaluate(expression)
            .await
            .map_err(|e| AdapterError::Evaluate(e.to_string()))?;
        result
            .into_value()
            .map_err(|e| AdapterError::Evaluate(e.to_string()))
    }

    pub async fn click(&self, selector: &str, timeout: Duration) -> Result<(), AdapterError> {
        self.with_element(selector, timeout, |el| async move {
            el.click()
                .await
                .map(|_| ())
                .map_err(|e| AdapterError::Cdp(e.to_string()))
        })
        .await
    }

    pub async fn hover(&self, selector: &str, timeout: Duration) -> Result<(), AdapterError> {
        self.with_element(selector, timeout, |el| async move {
            el.hover()
                .await
                .map(|_| ())
                .map_err(|e| AdapterError::Cdp(e.to_string()))
        })
        .await
    }

    pub async fn fill(
        &self,
        selector: &str,
        text: &str,
        timeout: Duration,
    ) -> Result<(), AdapterError> {
        let text = text.to_string();
        self.with_element(selector, timeout, move |el| {
            let text = text.clone();
            async move {
                el.click()
                    .await
                    .map_err(|e| AdapterError::Cdp(e.to_string()))?;
                el.type_str(&text)
                    .await
                    .map(|_| ())
                    .map_err(|e| AdapterError::Cdp(e.to_string()))
            }
        })
        .await
    }

    /// Sets a `<select>`'s value by dispatching a synthetic `change` event —
    /// chromiumoxide has no native select-option primitive.
    pub async fn select_option(
        &self,
        selector: &str,
        value: &str,
        timeout: Duration,
    ) -> Result<(), AdapterError> {
        tokio::time::timeout(timeout, async {
            let script = format!(
                "(() => {{ const el = document.querySelector({sel}); if (!el) return false; \
                 el.value = {val}; el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                 return true; }})()",
                sel = serde_json::to_string(selector).unwrap_or_default(),
                val = serde_json::to_string(value).unwrap_or_default(),
            );
            match self.evaluate(&script).await? {
                Value::Bool(true) => Ok(()),
                _ => Err(AdapterError::ElementNotFound(selector.to_string())),
            }
        })
        .await
        .map_err(|_| AdapterError::Timeout(format!("select {selector}")))?
    }

    /// Presses a key on whichever element currently has focus, via a
    /// synthetic CDP key event — matches how a real user interacts after
    /// tabbing or clicking into a field.
    pub async fn press_key(&self, key: &str) -> Result<(), AdapterError> {
        let down = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::RawKeyDown)
            .key(key)
            .build()
            .map_err(AdapterError::Cdp)?;
        let up = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::KeyUp)
            .key(key)
            .build()
            .map_err(AdapterError::Cdp)?;
        self.page
            .execute(down)
            .await
            .map_err(|e| AdapterError::Cdp(e.to_string()))?;
        self.page
            .execute(up)
            .await
            .map_err(|e| AdapterError::Cdp(e.to_string()))?;
        Ok(())
    }

    pub async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), AdapterError> {
        tokio::time::timeout(timeout, async {
            loop {
                if self.page.find_element(selector).await.is_ok() {
                    return Ok(());
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        })
        .await
        .map_err(|_| AdapterError::Timeout(format!("selector {selector}")))?
    }

    /// Polls `document.readyState` and outstanding-request heuristics until
    /// the page settles, or the deadline passes — a best-effort stand-in for
    /// `networkidle` since chromiumoxide exposes no native wait-for-idle.
    pub async fn wait_for_load_state(&self, timeout: Duration) -> Result<(), AdapterError> {
        tokio::time::timeout(timeout, async {
            loop {
                if let Ok(Value::String(state)) =
                    self.evaluate("document.readyState").await
                {
                    if state == "complete" {
                        return Ok(());
                    }
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        })
        .await
        .map_err(|_| AdapterError::Timeout("load state".into()))?
    }

    pub async fn wait_for_timeout(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// `quality` is the JPEG quality (1-100); callers are expected to clamp
    /// it to that range before calling (the executor does so from
    /// `AgentConfig::jpeg_quality`).
    pub async fn screenshot(&self, quality: u8) -> Result<Vec<u8>, AdapterError> {
        let params = ScreenshotParams::builder()
            .format(CdpScreenshotFormat::Jpeg)
            .quality(quality as i64)
            .build();
        self.page
            .screenshot(params)
            .await
            .map_err(|e| AdapterError::Cdp(e.to_string()))
    }

    /// The full accessibility tree as CDP returns it — raw JSON, left for
    /// the snapshot builder to shape.
    pub async fn accessibility_tree(&self) -> Result<Value, AdapterError> {
        let tree = self
            .page
            .execute(GetFullAxTreeParams::default())
            .await
            .map_err(|e| AdapterError::Cdp(e.to_string()))?;
        serde_json::to_value(tree.result.nodes.clone())
            .map_err(|e| AdapterError::Evaluate(e.to_string()))
    }

    /// Resolves a `role=<role>[name="..."]` locator to a CSS selector by
    /// tagging the matching element with a throwaway data attribute, the
    /// same trick Playwright's engine performs internally.
    pub async fn resolve_role_locator(
        &self,
        role: &str,
        name: Option<&str>,
        timeout: Duration,
    ) -> Result<String, AdapterError> {
        let marker = format!(
            "data-auspex-role-{}",
            uuid_like_suffix(role, name.unwrap_or(""))
        );
        let script = format!(
            "(() => {{ const role = {role}; const name = {name}; \
             const candidates = Array.from(document.querySelectorAll(`[role=\"${{role}}\"], ${{role}}`)); \
             const match = candidates.find(el => {{ \
               if (!name) return true; \
               const label = (el.getAttribute('aria-label') || el.innerText || el.value || '').trim(); \
               return label === name; \
             }}); \
             if (!match) return false; \
             match.setAttribute('{marker}', '1'); \
             return true; }})()",
            role = serde_json::to_string(role).unwrap_or_default(),
            name = name
                .map(|n| serde_json::to_string(n).unwrap_or_default())
                .unwrap_or_else(|| "null".to_string()),
        );
        tokio::time::timeout(timeout, async {
            match self.evaluate(&script).await? {
                Value::Bool(true) => Ok(format!("[{marker}]")),
                _ => Err(AdapterError::ElementNotFound(format!(
                    "role={role}{}",
                    name.map(|n| format!("[name=\"{n}\"]")).unwrap_or_default()
                ))),
            }
        })
        .await
        .map_err(|_| AdapterError::Timeout(format!("role locator {role}")))?
    }

    async fn with_element<F, Fut>(
        &self,
        selector: &str,
        timeout: Duration,
        op: F,
    ) -> Result<(), AdapterError>
    where
        F: FnOnce(chromiumoxide::Element) -> Fut,
        Fut: std::future::Future<Output = Result<(), AdapterError>>,
    {
        tokio::time::timeout(timeout, async {
            let element = self
                .page
                .find_element(selector)
                .await
                .map_err(|_| AdapterError::ElementNotFound(selector.to_string()))?;
            op(element).await
        })
        .await
        .map_err(|_| AdapterError::Timeout(selector.to_string()))?
    }
}

fn uuid_like_suffix(a: &str, b: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    a.hash(&mut hasher);
    b.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

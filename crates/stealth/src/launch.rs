//! Anti-automation Chromium launch arguments and per-context fingerprint
//! defaults for the browser tier (§4.9 Tier 3).

/// Launch args that suppress the most common headless/automation tells.
/// Applied once per launched Chromium process, shared by the Browser Pool
/// (C10) and the scraper cascade's browser tier.
pub fn anti_automation_args() -> Vec<&'static str> {
    vec![
        "--disable-blink-features=AutomationControlled",
        "--disable-infobars",
        "--no-first-run",
        "--no-default-browser-check",
        "--disable-dev-shm-usage",
        "--disable-background-timer-throttling",
        "--disable-backgrounding-occluded-windows",
        "--disable-renderer-backgrounding",
        "--disable-component-extensions-with-background-pages",
    ]
}

/// Fixed viewport for the scraper cascade's browser-tier context (§4.9).
pub const VIEWPORT: (u32, u32) = (1920, 1080);

#[derive(Clone, Debug)]
pub struct ContextFingerprint {
    pub user_agent: String,
    pub locale: String,
    pub timezone_id: String,
}

impl Default for ContextFingerprint {
    fn default() -> Self {
        Self {
            user_agent: crate::headers::DEFAULT_USER_AGENT.to_string(),
            locale: "en-US".to_string(),
            timezone_id: "America/New_York".to_string(),
        }
    }
}

//! Anti-fingerprinting assets shared by the Scraper Cascade (C11) and the
//! action executor's `goto` handling: header profiles for the HTTP tiers,
//! Chromium launch arguments for the browser tier, the analytics-tracker
//! blocklist used by route interception, and the opaque `STEALTH_INIT_SCRIPT`
//! asset the spec (§6) treats as a black box injected before any page
//! script runs.

pub mod headers;
pub mod launch;

/// A process-wide fixed JavaScript string added to every browser context
/// before navigation (§6 "Injected assets"). Its contents are intentionally
/// opaque to the rest of the crate — callers only need the guarantee that it
/// runs before any page script (`chromiumoxide`'s `add_script_to_evaluate_on_new_document`,
/// wired in `cdp-adapter`).
pub const STEALTH_INIT_SCRIPT: &str = r#"(() => {
  // navigator.webdriver must read as undefined, not false — some detectors
  // specifically check for the false case Playwright/Puppeteer patch in.
  Object.defineProperty(Navigator.prototype, 'webdriver', { get: () => undefined });

  // Headless Chrome omits the plugins/mimeTypes a real browser profile has.
  Object.defineProperty(navigator, 'plugins', {
    get: () => [1, 2, 3, 4, 5].map(() => ({ name: 'Chrome PDF Plugin' })),
  });
  Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'] });

  // chrome.runtime exists on real Chrome even on non-extension pages.
  window.chrome = window.chrome || { runtime: {} };

  // Patch the permissions API's notorious headless tell: querying
  // "notifications" returns "denied" rather than mirroring Notification.permission.
  const originalQuery = window.navigator.permissions.query;
  window.navigator.permissions.query = (parameters) =>
    parameters.name === 'notifications'
      ? Promise.resolve({ state: Notification.permission })
      : originalQuery(parameters);

  // WebGL vendor/renderer strings that fingerprint scripts use to flag
  // software rendering under headless Chromium.
  const getParameter = WebGLRenderingContext.prototype.getParameter;
  WebGLRenderingContext.prototype.getParameter = function (parameter) {
    if (parameter === 37445) return 'Intel Inc.';
    if (parameter === 37446) return 'Intel Iris OpenGL Engine';
    return getParameter.call(this, parameter);
  };
})();"#;

/// Analytics/tracker hostnames aborted during route interception in the
/// browser tier (§4.9 Tier 3) — reduces noise and fingerprint surface
/// without affecting the page's own content.
pub const ANALYTICS_TRACKER_BLOCKLIST: &[&str] = &[
    "google-analytics",
    "googletagmanager",
    "facebook.com/tr",
    "connect.facebook.net",
    "hotjar",
    "fullstory",
    "segment.io",
    "segment.com",
    "mixpanel",
    "amplitude",
    "sentry.io",
    "clarity.ms",
    "doubleclick",
    "adnxs",
    "criteo",
    "taboola",
    "outbrain",
];

/// Resource types aborted during route interception (§4.9 Tier 3).
pub const ABORTED_RESOURCE_TYPES: &[&str] = &["font", "media", "image"];

/// True if `url` should be aborted by the tracker blocklist.
pub fn is_tracker_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    ANALYTICS_TRACKER_BLOCKLIST
        .iter()
        .any(|needle| lower.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_known_trackers() {
        assert!(is_tracker_url("https://www.google-analytics.com/collect"));
        assert!(is_tracker_url("https://connect.facebook.net/en_US/fbevents.js"));
        assert!(!is_tracker_url("https://example.com/main.js"));
    }
}

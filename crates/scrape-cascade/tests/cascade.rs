//! Black-box tests for the cascade orchestrator's URL-safety gate (§6
//! "Wire-level safety"). Tier-specific fetch behavior (status handling,
//! content-type rejection, escalation thresholds) is exercised as unit
//! tests next to each tier module, since mock HTTP servers bind to
//! loopback addresses that the safety gate itself must reject — testing
//! tier behavior through the full `scrape()` entry point would be
//! confounded by that same protection. The browser tier needs a real
//! Chromium binary; its `ChromeDriver`/`DriverPage` surface is covered by
//! `cdp-adapter`'s ignored contract tests instead of a unit test here.

use auspex_scrape_cascade::{scrape, ScrapeError, ScrapeOptions};

#[tokio::test]
async fn url_safety_rejects_private_targets_before_any_request() {
    let opts = ScrapeOptions::default();
    let result = scrape("http://169.254.169.254/latest/meta-data/", &opts).await;
    assert!(matches!(result, Err(ScrapeError::UrlRejected(_))));
}

#[tokio::test]
async fn url_safety_rejects_non_http_schemes() {
    let opts = ScrapeOptions::default();
    let result = scrape("javascript:alert(1)", &opts).await;
    assert!(matches!(result, Err(ScrapeError::UrlRejected(_))));
}

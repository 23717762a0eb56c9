//! Scraper Cascade (C11): three progressively heavier fetchers — plain
//! HTTP, stealth HTTP, and a full headless browser — feeding the shared
//! Content Extractor (§4.9). The same URL-safety layer (C1) gates every
//! tier before any DNS/TCP activity begins (§6 "Wire-level safety").

mod batch;
mod browser_tier;
mod errors;
mod http_tier;
mod stealth_tier;

pub use batch::{scrape_many, DEFAULT_BATCH_CONCURRENCY};
pub use browser_tier::{BrowserTier, BrowserTierOptions};
pub use errors::{ScrapeError, TierFailure};

use errors::consolidated_message;

use std::time::Duration;

use auspex_content_extractor::ExtractedContent;
use auspex_stealth::headers::{tier1_headers, DEFAULT_USER_AGENT};
use auspex_url_safety::AllowBlockPolicy;

/// One of the three tiers the scraper can resolve a URL at (§2 glossary).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScrapeTier {
    Http,
    Stealth,
    Browser,
}

/// A scrape outcome: which tier resolved it, the HTTP status observed (200
/// for the browser tier, which has no single status code of its own), the
/// final (post-redirect) URL, and the extracted content. When every tier in
/// the cascade is exhausted, `status_code` is `0` and `content` carries the
/// consolidated, multi-line cause list in place of extracted text (§4.9).
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub tier: ScrapeTier,
    pub status_code: u16,
    pub final_url: String,
    pub content: ExtractedContent,
}

/// Runtime knobs for a single `scrape` call (§4.9).
#[derive(Clone, Debug, Default)]
pub struct ScrapeOptions {
    pub force_tier: Option<ScrapeTier>,
    pub main_only: bool,
    pub timeout: Option<Duration>,
    pub policy: AllowBlockPolicy,
    pub browser: Option<BrowserTierOptions>,
}

/// Validate `url` via C1, then either dispatch a single forced tier or walk
/// the cascade: tier 1, then tier 2, then tier 3 as a last chance. A tier
/// advances past when it throws, or succeeds but yields markdown under 200
/// chars with no SSR data. If tier 3 also fails, returns `Ok` with a
/// consolidated, `status_code: 0` outcome listing every tier's cause rather
/// than an `Err` — the cascade itself never fails to produce an outcome,
/// only a tier does (§4.9).
pub async fn scrape(url: &str, opts: &ScrapeOptions) -> Result<ScrapeOutcome, ScrapeError> {
    auspex_url_safety::validate(url, &opts.policy)
        .await
        .map_err(|e| ScrapeError::UrlRejected(e.to_string()))?;

    let timeout = opts.timeout.unwrap_or(Duration::from_secs(15));

    if let Some(forced) = opts.force_tier {
        return match forced {
            ScrapeTier::Http => http_tier::fetch(url, opts.main_only, timeout)
                .await
                .map_err(ScrapeError::Tier),
            ScrapeTier::Stealth => stealth_tier::fetch(url, opts.main_only, timeout)
                .await
                .map_err(ScrapeError::Tier),
            ScrapeTier::Browser => {
                let browser_opts = opts.browser.clone().unwrap_or_default();
                let tier = BrowserTier::new(true);
                let result = tier
                    .fetch(url, opts.main_only, timeout, &browser_opts)
                    .await
                    .map_err(ScrapeError::Tier);
                tier.shutdown().await;
                result
            }
        };
    }

    let mut failures = Vec::new();

    match http_tier::fetch(url, opts.main_only, timeout).await {
        Ok(outcome) => return Ok(outcome),
        Err(failure) => failures.push(failure),
    }

    match stealth_tier::fetch(url, opts.main_only, timeout).await {
        Ok(outcome) => return Ok(outcome),
        Err(failure) => failures.push(failure),
    }

    let browser_opts = opts.browser.clone().unwrap_or_default();
    let tier = BrowserTier::new(true);
    let browser_result = tier.fetch(url, opts.main_only, timeout, &browser_opts).await;
    tier.shutdown().await;
    match browser_result {
        Ok(outcome) => Ok(outcome),
        Err(failure) => {
            failures.push(failure);
            Ok(exhausted_outcome(url, failures))
        }
    }
}

/// Builds the consolidated, `status_code: 0` outcome returned when every
/// tier in the cascade has failed: `content` carries the multi-line cause
/// list in place of extracted text, so the caller still gets a renderable
/// result rather than an error to unwrap (§4.9).
fn exhausted_outcome(url: &str, failures: Vec<TierFailure>) -> ScrapeOutcome {
    let message = consolidated_message(&failures);
    ScrapeOutcome {
        tier: ScrapeTier::Browser,
        status_code: 0,
        final_url: url.to_string(),
        content: ExtractedContent {
            html: String::new(),
            text: message.clone(),
            markdown: message,
            title: String::new(),
            description: String::new(),
            links: Vec::new(),
            ssr_framework: None,
            ssr_data: None,
        },
    }
}

/// Fetches a URL's raw HTML with no content-extraction pass — the static
/// loop's orchestrator needs the unprocessed document to build its snapshot
/// (links, forms) rather than the Readability-reduced article text `scrape`
/// produces. Uses the same tier-1 header profile and URL-safety gate as the
/// cascade proper, but always returns whatever was fetched rather than
/// escalating tiers on thin content.
pub async fn fetch_raw_html(
    url: &str,
    policy: &AllowBlockPolicy,
    timeout: Duration,
) -> Result<(String, String), ScrapeError> {
    auspex_url_safety::validate(url, policy)
        .await
        .map_err(|e| ScrapeError::UrlRejected(e.to_string()))?;

    let client = reqwest::Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| ScrapeError::Tier(TierFailure { tier: ScrapeTier::Http, reason: e.to_string() }))?;

    let mut request = client.get(url);
    for (key, value) in tier1_headers() {
        request = request.header(key, value);
    }
    let response = request.send().await.map_err(|e| {
        ScrapeError::Tier(TierFailure { tier: ScrapeTier::Http, reason: e.to_string() })
    })?;
    let final_url = response.url().to_string();
    let html = response.text().await.map_err(|e| {
        ScrapeError::Tier(TierFailure { tier: ScrapeTier::Http, reason: e.to_string() })
    })?;
    Ok((final_url, html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrape_tier_is_copy_and_comparable() {
        assert_eq!(ScrapeTier::Http, ScrapeTier::Http);
        assert_ne!(ScrapeTier::Http, ScrapeTier::Browser);
    }

    #[test]
    fn exhausted_outcome_is_ok_shaped_with_status_zero_and_every_cause() {
        let failures = vec![
            TierFailure { tier: ScrapeTier::Http, reason: "HTTP 403".to_string() },
            TierFailure { tier: ScrapeTier::Stealth, reason: "HTTP 503".to_string() },
            TierFailure { tier: ScrapeTier::Browser, reason: "navigation timed out".to_string() },
        ];
        let outcome = exhausted_outcome("https://example.com/", failures);
        assert_eq!(outcome.status_code, 0);
        assert_eq!(outcome.final_url, "https://example.com/");
        assert!(outcome.content.text.contains("HTTP 403"));
        assert!(outcome.content.text.contains("HTTP 503"));
        assert!(outcome.content.text.contains("navigation timed out"));
    }
}

//! Tier 1 ("plain HTTP"): a browser-like request with a spoofed header
//! profile, no JavaScript execution (§4.9 Tier 1).

use std::time::Duration;

use auspex_content_extractor::{extract, has_enough_content};
use auspex_stealth::headers::{tier1_headers, DEFAULT_USER_AGENT};
use reqwest::Client;

use crate::{ScrapeOutcome, ScrapeTier, TierFailure};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const ANTI_BOT_STATUSES: &[u16] = &[403, 429, 503];

pub async fn fetch(
    url: &str,
    main_only: bool,
    timeout: Duration,
) -> Result<ScrapeOutcome, TierFailure> {
    let tier = ScrapeTier::Http;
    let client = Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .timeout(timeout.max(Duration::from_secs(1)).min(DEFAULT_TIMEOUT * 2))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| fail(tier, format!("client build failed: {e}")))?;

    let mut request = client.get(url);
    for (key, value) in tier1_headers() {
        request = request.header(key, value);
    }

    let response = request
        .send()
        .await
        .map_err(|e| fail(tier, format!("request failed: {e}")))?;

    let status = response.status();
    if ANTI_BOT_STATUSES.contains(&status.as_u16()) {
        return Err(fail(tier, format!("anti-bot response: HTTP {status}")));
    }
    if status.as_u16() >= 400 {
        return Err(fail(tier, format!("HTTP {status}")));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();
    if !content_type.contains("text/html") && !content_type.contains("text/plain") {
        return Err(fail(tier, format!("unsupported content-type: {content_type}")));
    }

    let final_url = response.url().to_string();
    let html = response
        .text()
        .await
        .map_err(|e| fail(tier, format!("failed to read body: {e}")))?;

    // `has_enough_content` operates on the raw markup; it may strip tags
    // destructively in the process, which is fine — content extraction below
    // re-parses `html` independently (§4.9 Tier 1).
    if !has_enough_content(&html) {
        return Err(fail(tier, "insufficient content after stripping noise".to_string()));
    }

    let extracted = extract(&html, main_only, &final_url)
        .map_err(|e| fail(tier, format!("extraction failed: {e}")))?;

    if extracted.markdown.len() < 200 && extracted.ssr_data.is_none() {
        return Err(fail(tier, "extracted content too short and no SSR data".to_string()));
    }

    Ok(ScrapeOutcome {
        tier,
        status_code: status.as_u16(),
        final_url,
        content: extracted,
    })
}

fn fail(tier: ScrapeTier, reason: String) -> TierFailure {
    TierFailure { tier, reason }
}

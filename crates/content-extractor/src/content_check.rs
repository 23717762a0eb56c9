//! Two related but distinct phrase-based page classifiers (§4.4, §4.6):
//! `has_enough_content` decides whether a scrape tier should escalate to a
//! heavier one; `is_blocked_page` is consulted by the interactive loop to
//! recognize a dead end worth aborting on. The phrase lists overlap but are
//! not identical — anti-bot interstitials are not always un-navigable, and
//! vice versa.

use once_cell::sync::Lazy;
use regex::Regex;

const MIN_BODY_CHARS: usize = 200;
const SHORT_BODY_CHARS: usize = 2000;

const ANTI_BOT_PHRASES: &[&str] = &[
    "just a moment",
    "checking your browser",
    "ray id",
    "ddos-guard",
    "incapsula",
    "imperva",
    "datadome",
    "captcha",
    "enable javascript",
    "access denied",
    "bot detected",
];

const BLOCKED_PAGE_URL_MARKERS: &[&str] = &["/sorry/", "/captcha", "/challenge", "/recaptcha", "/blocked"];

const BLOCKED_PAGE_BODY_PHRASES: &[&str] = &[
    "unusual traffic",
    "not a robot",
    "captcha",
    "blocked your ip",
    "access denied",
    "rate limit",
];

static STRIP_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|iframe|svg|img)\b[^>]*>.*?</\1>")
        .expect("valid regex")
});
static SELF_CLOSING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<img\b[^>]*/?>").expect("valid regex"));
static TAG_SEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]+>").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

fn body_text(html: &str) -> String {
    let stripped = STRIP_TAGS.replace_all(html, "");
    let stripped = SELF_CLOSING.replace_all(&stripped, "");
    let text = TAG_SEL.replace_all(&stripped, " ");
    WHITESPACE.replace_all(text.trim(), " ").to_string()
}

/// `false` if the stripped body is under 200 chars, or under 2 000 chars and
/// matches a known anti-bot/challenge phrase (§4.4).
pub fn has_enough_content(html: &str) -> bool {
    let text = body_text(html);
    let lower = text.to_ascii_lowercase();
    if text.len() < MIN_BODY_CHARS {
        return false;
    }
    if text.len() < SHORT_BODY_CHARS && ANTI_BOT_PHRASES.iter().any(|p| lower.contains(p)) {
        return false;
    }
    true
}

/// Whether the page looks like a dead end the interactive loop should abort
/// on rather than keep iterating against (§4.6 step 6): the final URL
/// carries a blocked-page marker, or the body is short and matches one of a
/// closed set of block phrases.
pub fn is_blocked_page(final_url: &str, html: &str) -> bool {
    let lower_url = final_url.to_ascii_lowercase();
    if BLOCKED_PAGE_URL_MARKERS.iter().any(|m| lower_url.contains(m)) {
        return true;
    }
    let text = body_text(html);
    if text.len() >= SHORT_BODY_CHARS {
        return false;
    }
    let lower = text.to_ascii_lowercase();
    BLOCKED_PAGE_BODY_PHRASES.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_has_insufficient_content() {
        assert!(!has_enough_content("<html><body>too short</body></html>"));
    }

    #[test]
    fn long_ordinary_body_has_enough_content() {
        let body = "word ".repeat(100);
        let html = format!("<html><body>{body}</body></html>");
        assert!(has_enough_content(&html));
    }

    #[test]
    fn short_challenge_page_is_insufficient() {
        let html = "<html><body>Checking your browser before accessing this site. Just a moment please.</body></html>";
        assert!(!has_enough_content(html));
    }

    #[test]
    fn blocked_page_url_marker_is_detected() {
        assert!(is_blocked_page(
            "https://example.com/sorry/index.html",
            "<html><body><p>nothing special</p></body></html>"
        ));
    }

    #[test]
    fn blocked_page_body_phrase_is_detected() {
        let html = "<html><body><p>We have detected unusual traffic from your network.</p></body></html>";
        assert!(is_blocked_page("https://example.com/", html));
    }

    #[test]
    fn ordinary_page_is_not_blocked() {
        let html = "<html><body><p>Welcome to our totally normal page.</p></body></html>";
        assert!(!is_blocked_page("https://example.com/", html));
    }
}

//! The noise-link filter applied after URL resolution (§4.3), shared by
//! both snapshot modes.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Social/messaging hosts dropped regardless of link text, after trimming a
/// leading `www.` (§4.3).
const SOCIAL_DOMAIN_BLOCKLIST: &[&str] = &[
    "twitter.com",
    "x.com",
    "facebook.com",
    "instagram.com",
    "linkedin.com",
    "youtube.com",
    "tiktok.com",
    "t.me",
    "wa.me",
    "discord.gg",
    "github.com",
];

static ASSET_EXTENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(png|jpe?g|gif|svg|ico|webp|css|js|woff2?|ttf|eot)(\?.*)?$")
        .expect("valid regex")
});

/// True if `href` (already resolved to absolute form) should be dropped from
/// a snapshot's link list.
pub fn is_noise_link(href: &str, text: &str) -> bool {
    let trimmed_href = href.trim();
    if trimmed_href.is_empty() || trimmed_href.starts_with('#') {
        return true;
    }
    let lower = trimmed_href.to_ascii_lowercase();
    if lower.starts_with("javascript:") || lower.starts_with("mailto:") || lower.starts_with("tel:")
    {
        return true;
    }
    if text.trim().is_empty() {
        return true;
    }
    if ASSET_EXTENSION.is_match(trimmed_href) {
        return true;
    }
    if let Ok(url) = Url::parse(trimmed_href) {
        if let Some(host) = url.host_str() {
            let host = host.strip_prefix("www.").unwrap_or(host);
            if SOCIAL_DOMAIN_BLOCKLIST.iter().any(|blocked| host == *blocked) {
                return true;
            }
        }
    }
    false
}

/// Resolve `href` against `base` into an absolute URL string; `None` if it
/// cannot be resolved at all (malformed relative reference).
pub fn resolve_href(base: &Url, href: &str) -> Option<String> {
    base.join(href.trim()).ok().map(|u| u.to_string())
}

/// URLs longer than 150 chars are truncated to `origin+path` plus a `?...`
/// marker if a query existed (§4.3 "Format for LLM").
pub fn truncate_url_for_display(url: &str) -> String {
    if url.chars().count() <= 150 {
        return url.to_string();
    }
    match Url::parse(url) {
        Ok(parsed) => {
            let mut short = format!("{}{}", parsed.origin().ascii_serialization(), parsed.path());
            if parsed.query().is_some() {
                short.push_str("?...");
            }
            short
        }
        Err(_) => url.chars().take(150).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_hash_javascript_mailto_tel() {
        assert!(is_noise_link("#", "x"));
        assert!(is_noise_link("javascript:void(0)", "x"));
        assert!(is_noise_link("mailto:a@b.com", "x"));
        assert!(is_noise_link("tel:+123", "x"));
    }

    #[test]
    fn drops_empty_text_and_assets() {
        assert!(is_noise_link("https://example.com/x", ""));
        assert!(is_noise_link("https://example.com/logo.png", "logo"));
        assert!(is_noise_link("https://example.com/app.js?v=2", "script"));
    }

    #[test]
    fn drops_social_hosts_with_or_without_www() {
        assert!(is_noise_link("https://twitter.com/foo", "Follow us"));
        assert!(is_noise_link("https://www.facebook.com/foo", "Like us"));
        assert!(is_noise_link("https://github.com/foo", "Star us"));
    }

    #[test]
    fn keeps_real_content_links() {
        assert!(!is_noise_link("https://example.com/story/1", "Read more"));
    }

    #[test]
    fn truncates_long_urls_to_origin_path() {
        let long = format!("https://example.com/{}?x=1", "a".repeat(200));
        let short = truncate_url_for_display(&long);
        assert!(short.len() < long.len());
        assert!(short.ends_with("?..."));
    }
}

//! Header profiles for the HTTP scraper tiers (§4.9 Tier 1, Tier 2).

/// Tier 1 ("plain HTTP"): a small, browser-like header set layered on top of
/// a spoofed TLS/JA3 fingerprint (the fingerprint itself is a property of the
/// HTTP client configuration in `scrape-cascade`, not of this header list).
pub fn tier1_headers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Accept-Language", "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7"),
        ("Cache-Control", "no-cache"),
        ("Pragma", "no-cache"),
    ]
}

/// Tier 2 ("stealth HTTP"): the full realistic header set a modern Chrome
/// sends, including the `Sec-Fetch-*` family.
pub fn tier2_headers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Accept-Language", "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7"),
        ("Cache-Control", "no-cache"),
        ("Pragma", "no-cache"),
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
        ("Upgrade-Insecure-Requests", "1"),
        ("Sec-Fetch-Dest", "document"),
        ("Sec-Fetch-Mode", "navigate"),
        ("Sec-Fetch-Site", "none"),
        ("Sec-Fetch-User", "?1"),
        ("Sec-Ch-Ua-Mobile", "?0"),
        ("Sec-Ch-Ua-Platform", "\"Windows\""),
    ]
}

/// Default browser-like user agent shared by both HTTP tiers and the
/// browser tier's context unless the caller overrides it.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0.0.0 Safari/537.36";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier2_is_a_superset_of_tier1_keys() {
        let t1: Vec<_> = tier1_headers().into_iter().map(|(k, _)| k).collect();
        let t2: Vec<_> = tier2_headers().into_iter().map(|(k, _)| k).collect();
        for key in t1 {
            assert!(t2.contains(&key), "tier2 missing {key}");
        }
    }
}

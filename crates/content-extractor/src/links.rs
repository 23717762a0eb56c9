//! Link extraction: deduplicated absolute URLs, skipping `#`, `javascript:`,
//! `mailto:`, `tel:` (§4.4).

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

static ANCHOR_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

pub fn extract_links(document: &Html, base: &Url) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for el in document.select(&ANCHOR_SEL) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let trimmed = href.trim();
        let lower = trimmed.to_ascii_lowercase();
        if trimmed.is_empty()
            || trimmed.starts_with('#')
            || lower.starts_with("javascript:")
            || lower.starts_with("mailto:")
            || lower.starts_with("tel:")
        {
            continue;
        }
        let Ok(resolved) = base.join(trimmed) else {
            continue;
        };
        let resolved = resolved.to_string();
        if seen.insert(resolved.clone()) {
            out.push(resolved);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupes_and_skips_non_navigable_schemes() {
        let html = r#"<html><body>
            <a href="/a">A</a>
            <a href="/a">A again</a>
            <a href="#top">Top</a>
            <a href="javascript:void(0)">JS</a>
            <a href="mailto:x@y.com">Mail</a>
            <a href="tel:+1">Call</a>
        </body></html>"#;
        let document = Html::parse_document(html);
        let base = Url::parse("https://example.com/").unwrap();
        let links = extract_links(&document, &base);
        assert_eq!(links, vec!["https://example.com/a".to_string()]);
    }
}

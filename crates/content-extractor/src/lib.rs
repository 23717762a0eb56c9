//! Content Extractor (C4) and SSR Data Detector (C5): turn raw page HTML
//! into the bounded `{html, text, markdown, title, description, links}`
//! shape the rest of the system consumes, plus phrase-based content-quality
//! classifiers shared by the scrape cascade and the interactive loop.

mod content_check;
mod errors;
mod heuristic;
mod links;
mod metadata;
mod readability;
mod ssr;

pub use content_check::{has_enough_content, is_blocked_page};
pub use errors::ExtractError;
pub use ssr::detect_ssr_data;

use scraper::Html;
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// Output of [`extract`]: the main-content HTML/text (Readability-first,
/// heuristic fallback), its Markdown rendering, page metadata, the page's
/// absolute link set, and any detected SSR-embedded framework state.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedContent {
    pub html: String,
    pub text: String,
    pub markdown: String,
    pub title: String,
    pub description: String,
    pub links: Vec<String>,
    pub ssr_framework: Option<String>,
    pub ssr_data: Option<Value>,
}

/// Given raw HTML, whether to restrict extraction to the main content
/// region, and the page's base URL, produce an [`ExtractedContent`] (§4.4).
///
/// Tries a Readability-style scoring pass first; if it rejects the winning
/// candidate (text under 100 chars), falls back to a selector-priority
/// heuristic pass. When `main_only` is false, the whole document's text and
/// markdown are used instead of either candidate pass.
pub fn extract(html: &str, main_only: bool, base_url: &str) -> Result<ExtractedContent, ExtractError> {
    let base = Url::parse(base_url).map_err(|e| ExtractError::InvalidBaseUrl(e.to_string()))?;
    let document = Html::parse_document(html);

    let (content_html, text) = if main_only {
        readability::extract_readability(&document).unwrap_or_else(|| heuristic::extract_heuristic(html))
    } else {
        (html.to_string(), document.root_element().text().collect())
    };

    let markdown = htmd::convert(&content_html).map_err(|e| ExtractError::Markdown(e.to_string()))?;

    let title = metadata::extract_title(&document);
    let description = metadata::extract_description(&document);
    let links = links::extract_links(&document, &base);
    let (ssr_framework, ssr_data) = match ssr::detect_ssr_data(html) {
        Some((name, value)) => (Some(name.to_string()), Some(value)),
        None => (None, None),
    };

    Ok(ExtractedContent {
        html: content_html,
        text,
        markdown,
        title,
        description,
        links,
        ssr_framework,
        ssr_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_main_content_with_readability_and_falls_back_to_heuristic() {
        let html = r#"<html><head><title>Article</title></head><body>
            <nav><p>Home</p></nav>
            <article>
                <p>This is a long enough paragraph, with a comma, to score well above the noise in the nav bar above it and elsewhere on this busy page.</p>
                <p>And a second paragraph continuing the same article with plenty more content, commas, and words to push the score up further still.</p>
            </article>
            <a href="/other">Other</a>
        </body></html>"#;
        let extracted = extract(html, true, "https://example.com/").unwrap();
        assert!(extracted.text.contains("long enough paragraph"));
        assert_eq!(extracted.title, "Article");
        assert_eq!(extracted.links, vec!["https://example.com/other".to_string()]);
    }

    #[test]
    fn detects_embedded_ssr_state() {
        let html = r#"<html><body><script id="__NEXT_DATA__" type="application/json">{"a":1}</script><p>hi</p></body></html>"#;
        let extracted = extract(html, false, "https://example.com/").unwrap();
        assert_eq!(extracted.ssr_framework.as_deref(), Some("next"));
        assert_eq!(extracted.ssr_data.unwrap()["a"], 1);
    }

    #[test]
    fn rejects_an_unparseable_base_url() {
        let err = extract("<html></html>", false, "not a url").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidBaseUrl(_)));
    }
}

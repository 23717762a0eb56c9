//! Title/description metadata extraction (§4.4).

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static TITLE_TAG: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static META_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static OG_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:description"]"#).unwrap());
static TWITTER_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="twitter:description"]"#).unwrap());

/// `<title>` > `og:title` > first `<h1>` (§4.4).
pub fn extract_title(document: &Html) -> String {
    if let Some(t) = document.select(&TITLE_TAG).next() {
        let text = t.text().collect::<String>();
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    if let Some(content) = meta_content(document, &OG_TITLE) {
        return content;
    }
    if let Some(h1) = document.select(&H1).next() {
        let text = h1.text().collect::<String>();
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    String::new()
}

/// `meta description` > `og:description` > `twitter:description` (§4.4).
pub fn extract_description(document: &Html) -> String {
    meta_content(document, &META_DESCRIPTION)
        .or_else(|| meta_content(document, &OG_DESCRIPTION))
        .or_else(|| meta_content(document, &TWITTER_DESCRIPTION))
        .unwrap_or_default()
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_prefers_title_tag_then_og_then_h1() {
        let doc = Html::parse_document("<html><head><title>  T  </title></head></html>");
        assert_eq!(extract_title(&doc), "T");

        let doc = Html::parse_document(
            r#"<html><head><meta property="og:title" content="OG"></head></html>"#,
        );
        assert_eq!(extract_title(&doc), "OG");

        let doc = Html::parse_document("<html><body><h1>Heading</h1></body></html>");
        assert_eq!(extract_title(&doc), "Heading");
    }

    #[test]
    fn description_prefers_meta_then_og_then_twitter() {
        let doc = Html::parse_document(
            r#"<html><head><meta name="description" content="D"></head></html>"#,
        );
        assert_eq!(extract_description(&doc), "D");
    }
}

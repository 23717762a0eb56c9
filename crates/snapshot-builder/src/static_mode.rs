//! Static-mode snapshot: from raw HTML + a base URL, no browser involved
//! (§4.3 "Static mode").

use auspex_core_types::{
    FormInfo, InputInfo, LinkInfo, PageSnapshot, MAX_BODY_TEXT_CHARS, MAX_FORMS,
    MAX_INPUTS_PER_FORM, MAX_LINKS, MAX_LINK_TEXT_CHARS, MAX_TITLE_CHARS,
};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::noise::{is_noise_link, resolve_href};

static TITLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static ANCHOR_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static FORM_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("form").unwrap());
static FORM_INPUT_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("input, textarea, select").unwrap());

static STRIP_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</\1>").expect("valid regex")
});
static TAG_SEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]+>").expect("valid regex"));

/// Build a [`PageSnapshot`] from raw HTML, resolving relative links against
/// `base_url`.
pub fn build_static_snapshot(html: &str, base_url: &str) -> PageSnapshot {
    let document = Html::parse_document(html);
    let base = Url::parse(base_url).ok();

    let title = document
        .select(&TITLE_SEL)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();
    let title = truncate_chars(title.trim(), MAX_TITLE_CHARS);

    let body_text = extract_body_text(html);

    let links = extract_links(&document, base.as_ref());
    let forms = extract_forms(&document);

    PageSnapshot {
        url: base_url.to_string(),
        title: if title.is_empty() {
            base_url.to_string()
        } else {
            title
        },
        text: body_text,
        links,
        forms,
        accessibility_tree: None,
        screenshot_base64_jpeg: None,
    }
}

/// Strip `<script>/<style>/<noscript>`, collapse whitespace, and truncate
/// to the body-text bound. Operates on the raw markup (not the parsed DOM)
/// so stripped subtrees never contribute text, matching §4.3 exactly.
fn extract_body_text(html: &str) -> String {
    let without_noise = STRIP_TAGS.replace_all(html, " ");
    let text_only = TAG_SEL.replace_all(&without_noise, " ");
    let decoded = decode_entities(&text_only);
    let collapsed = collapse_whitespace(&decoded);
    truncate_chars(&collapsed, MAX_BODY_TEXT_CHARS)
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

fn extract_links(document: &Html, base: Option<&Url>) -> Vec<LinkInfo> {
    let mut out = Vec::new();
    for el in document.select(&ANCHOR_SEL) {
        if out.len() >= MAX_LINKS {
            break;
        }
        let href = match el.value().attr("href") {
            Some(h) => h,
            None => continue,
        };
        let text = collapse_whitespace(&el.text().collect::<String>());

        let resolved = match base {
            Some(base) => match resolve_href(base, href) {
                Some(r) => r,
                None => continue,
            },
            None => href.to_string(),
        };

        if is_noise_link(&resolved, &text) {
            continue;
        }

        out.push(LinkInfo {
            text: truncate_chars(&text, MAX_LINK_TEXT_CHARS),
            href: resolved,
            index: out.len(),
        });
    }
    out
}

fn extract_forms(document: &Html) -> Vec<FormInfo> {
    let mut forms = Vec::new();
    for form_el in document.select(&FORM_SEL) {
        if forms.len() >= MAX_FORMS {
            break;
        }
        let mut inputs = Vec::new();
        for input_el in form_el.select(&FORM_INPUT_SEL) {
            if inputs.len() >= MAX_INPUTS_PER_FORM {
                break;
            }
            inputs.push(describe_input(input_el));
        }
        forms.push(FormInfo { inputs });
    }
    forms
}

fn describe_input(el: ElementRef) -> InputInfo {
    let tag = el.value().name();
    let name = el
        .value()
        .attr("name")
        .or_else(|| el.value().attr("id"))
        .unwrap_or(tag)
        .to_string();
    let input_type = el.value().attr("type").unwrap_or(tag).to_string();
    let placeholder = el.value().attr("placeholder").unwrap_or("").to_string();
    let selector = selector_for(el, tag);
    InputInfo {
        name,
        input_type,
        placeholder,
        selector,
    }
}

/// `#id || tag[name="…"] || tag` (§4.3).
pub(crate) fn selector_for(el: ElementRef, tag: &str) -> String {
    if let Some(id) = el.value().attr("id") {
        if !id.is_empty() {
            return format!("#{id}");
        }
    }
    if let Some(name) = el.value().attr("name") {
        if !name.is_empty() {
            return format!("{tag}[name=\"{name}\"]");
        }
    }
    tag.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_and_style_and_truncates() {
        let html = "<html><body><script>evil()</script><style>.x{}</style>\
                     <p>Hello   world</p></body></html>";
        let snap = build_static_snapshot(html, "https://example.com/");
        assert_eq!(snap.text, "Hello world");
    }

    #[test]
    fn resolves_links_and_filters_noise() {
        let html = r#"<html><body>
            <a href="/story/1">Read more</a>
            <a href="#">Skip</a>
            <a href="https://twitter.com/x">Follow</a>
        </body></html>"#;
        let snap = build_static_snapshot(html, "https://example.com/");
        assert_eq!(snap.links.len(), 1);
        assert_eq!(snap.links[0].href, "https://example.com/story/1");
        assert_eq!(snap.links[0].index, 0);
    }

    #[test]
    fn extracts_form_inputs_with_selector_priority() {
        let html = r#"<html><body><form>
            <input id="email" name="email_field" type="email" placeholder="you@x.com">
            <input name="plain">
            <input>
        </form></body></html>"#;
        let snap = build_static_snapshot(html, "https://example.com/");
        assert_eq!(snap.forms.len(), 1);
        let inputs = &snap.forms[0].inputs;
        assert_eq!(inputs[0].selector, "#email");
        assert_eq!(inputs[1].selector, "input[name=\"plain\"]");
        assert_eq!(inputs[2].selector, "input");
    }

    #[test]
    fn dense_indices_after_noise_filtering() {
        let html = r#"<html><body>
            <a href="#">skip</a>
            <a href="/a">A</a>
            <a href="/b">B</a>
        </body></html>"#;
        let snap = build_static_snapshot(html, "https://example.com/");
        let indices: Vec<_> = snap.links.iter().map(|l| l.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }
}

//! SSR Data Detector (C5): identify framework-embedded JSON state in raw
//! HTML, trying each framework signature in a fixed order and returning the
//! first that parses as valid JSON. Malformed JSON yields `None`, not an
//! error (§4.4).

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

type Detector = fn(&str, &Html) -> Option<Value>;

const DETECTORS: &[(&str, Detector)] = &[
    ("next", detect_next),
    ("angular", detect_angular),
    ("sveltekit_modern", detect_sveltekit_modern),
    ("nuxt", detect_nuxt),
    ("nuxt3", detect_nuxt3),
    ("gatsby", detect_gatsby),
    ("remix", detect_remix),
    ("tanstack", detect_tanstack),
    ("vue_ssr", detect_vue_ssr),
    ("sveltekit_legacy", detect_sveltekit_legacy),
    ("generic", detect_generic),
];

/// Try every framework signature in order; return `(framework_name, value)`
/// for the first that yields valid JSON.
pub fn detect_ssr_data(html: &str) -> Option<(&'static str, Value)> {
    let document = Html::parse_document(html);
    for (name, detector) in DETECTORS {
        if let Some(value) = detector(html, &document) {
            return Some((name, value));
        }
    }
    None
}

fn script_json_by_selector(document: &Html, selector: &Selector) -> Option<Value> {
    let el = document.select(selector).next()?;
    let text = el.text().collect::<String>();
    serde_json::from_str(text.trim()).ok()
}

fn window_assignment_json(html: &str, re: &Regex) -> Option<Value> {
    let caps = re.captures(html)?;
    let raw = caps.get(1)?.as_str();
    serde_json::from_str(raw).ok()
}

fn detect_next(_html: &str, document: &Html) -> Option<Value> {
    static SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("#__NEXT_DATA__").unwrap());
    script_json_by_selector(document, &SEL)
}

fn detect_angular(_html: &str, document: &Html) -> Option<Value> {
    static SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("script#ng-state").unwrap());
    script_json_by_selector(document, &SEL)
}

fn detect_sveltekit_modern(_html: &str, document: &Html) -> Option<Value> {
    static SEL: Lazy<Selector> =
        Lazy::new(|| Selector::parse("script[data-sveltekit-fetched]").unwrap());
    script_json_by_selector(document, &SEL)
}

fn detect_nuxt(html: &str, _document: &Html) -> Option<Value> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)window\.__NUXT__\s*=\s*(\{.*?\});").unwrap());
    window_assignment_json(html, &RE)
}

fn detect_nuxt3(html: &str, _document: &Html) -> Option<Value> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)window\.__nuxt_state__\s*=\s*'([^']*)'").unwrap());
    let caps = RE.captures(html)?;
    let encoded = caps.get(1)?.as_str();
    let decoded = urlencoding::decode(encoded).ok()?;
    serde_json::from_str(&decoded).ok()
}

fn detect_gatsby(html: &str, _document: &Html) -> Option<Value> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)window\.pageData\s*=\s*(\{.*?\});").unwrap());
    window_assignment_json(html, &RE)
}

fn detect_remix(html: &str, _document: &Html) -> Option<Value> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)window\.__remixContext\s*=\s*(\{.*?\});").unwrap());
    window_assignment_json(html, &RE)
}

fn detect_tanstack(html: &str, _document: &Html) -> Option<Value> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)window\.__TANSTACK_QUERY_STATE__\s*=\s*(\{.*?\});").unwrap());
    window_assignment_json(html, &RE)
}

fn detect_vue_ssr(html: &str, _document: &Html) -> Option<Value> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)window\.__VUE_SSR_CONTEXT__\s*=\s*(\{.*?\});").unwrap());
    window_assignment_json(html, &RE)
}

fn detect_sveltekit_legacy(html: &str, _document: &Html) -> Option<Value> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)window\.__sveltekit_data\s*=\s*(\{.*?\});").unwrap());
    window_assignment_json(html, &RE)
}

fn detect_generic(html: &str, _document: &Html) -> Option<Value> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"(?s)window\.(?:__INITIAL_STATE__|__APP_STATE__|__REDUX_STATE__|__STORE_STATE__|__DATA__|__STATE__|__PROPS__)\s*=\s*(\{.*?\});",
        )
        .unwrap()
    });
    window_assignment_json(html, &RE)
}

//! Live-mode snapshot: read a running browser page via in-page evaluation
//! (§4.3 "Live mode").

use std::time::Duration;

use auspex_cdp_adapter::DriverPage;
use auspex_core_types::{
    FormInfo, InputInfo, LinkInfo, PageSnapshot, MAX_AX_TREE_CHARS, MAX_FORMS,
    MAX_INPUTS_PER_FORM, MAX_LINKS, MAX_LINK_TEXT_CHARS, MAX_TITLE_CHARS,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::noise::is_noise_link;
use crate::static_mode::truncate_chars;

const RETRY_WAIT: Duration = Duration::from_secs(5);

/// The JS evaluated in-page to gather text/links/forms in one round trip —
/// mirrors the field shapes `static_mode` produces from raw HTML so both
/// paths feed the same formatter.
const EXTRACT_SCRIPT: &str = r#"(() => {
  function selectorFor(el) {
    if (el.id) return '#' + el.id;
    const name = el.getAttribute('name');
    if (name) return el.tagName.toLowerCase() + '[name="' + name + '"]';
    return el.tagName.toLowerCase();
  }
  const text = (document.body && document.body.innerText) || '';
  const links = Array.from(document.querySelectorAll('a[href]')).map(a => ({
    text: (a.innerText || a.textContent || '').trim(),
    href: a.href,
  }));
  const forms = Array.from(document.querySelectorAll('form')).slice(0, 5).map(f => ({
    inputs: Array.from(f.querySelectorAll('input, textarea, select')).map(el => ({
      name: el.getAttribute('name') || el.id || el.tagName.toLowerCase(),
      input_type: el.getAttribute('type') || el.tagName.toLowerCase(),
      placeholder: el.getAttribute('placeholder') || '',
      selector: selectorFor(el),
    })),
  }));
  return { text, links, forms };
})()"#;

#[derive(Deserialize)]
struct RawLink {
    text: String,
    href: String,
}

#[derive(Deserialize)]
struct RawInput {
    name: String,
    input_type: String,
    placeholder: String,
    selector: String,
}

#[derive(Deserialize)]
struct RawForm {
    inputs: Vec<RawInput>,
}

#[derive(Deserialize)]
struct RawExtraction {
    text: String,
    links: Vec<RawLink>,
    forms: Vec<RawForm>,
}

/// Build a [`PageSnapshot`] from a live page. Retries once across a
/// `domcontentloaded` wait if the execution context was destroyed mid-read;
/// falls back to a minimal snapshot on a second failure so the interactive
/// loop can keep going (§4.3).
pub async fn build_live_snapshot(page: &DriverPage, capture_ax_tree: bool) -> PageSnapshot {
    let url = page.url().await.unwrap_or_default();
    let title = match page.title().await {
        Ok(Some(t)) if !t.is_empty() => t,
        _ => url.clone(),
    };
    let title = truncate_chars(&title, MAX_TITLE_CHARS);

    let raw = match page.evaluate(EXTRACT_SCRIPT).await {
        Ok(v) => Some(v),
        Err(first_err) => {
            warn!(error = %first_err, "live snapshot evaluate failed, retrying after domcontentloaded");
            let _ = page.wait_for_load_state(RETRY_WAIT).await;
            page.evaluate(EXTRACT_SCRIPT).await.ok()
        }
    };

    let Some(raw) = raw else {
        return PageSnapshot::minimal(url);
    };

    let extraction: RawExtraction = match parse_extraction(raw) {
        Some(e) => e,
        None => return PageSnapshot::minimal(url),
    };

    let body_text = truncate_chars(
        &collapse_whitespace(&extraction.text),
        auspex_core_types::MAX_BODY_TEXT_CHARS,
    );

    let mut links = Vec::new();
    for raw_link in extraction.links {
        if links.len() >= MAX_LINKS {
            break;
        }
        let text = collapse_whitespace(&raw_link.text);
        if is_noise_link(&raw_link.href, &text) {
            continue;
        }
        links.push(LinkInfo {
            text: truncate_chars(&text, MAX_LINK_TEXT_CHARS),
            href: raw_link.href,
            index: links.len(),
        });
    }

    let mut forms = Vec::new();
    for raw_form in extraction.forms.into_iter().take(MAX_FORMS) {
        let inputs = raw_form
            .inputs
            .into_iter()
            .take(MAX_INPUTS_PER_FORM)
            .map(|i| InputInfo {
                name: i.name,
                input_type: i.input_type,
                placeholder: i.placeholder,
                selector: i.selector,
            })
            .collect();
        forms.push(FormInfo { inputs });
    }

    let accessibility_tree = if capture_ax_tree {
        capture_ax_tree_yaml(page).await
    } else {
        None
    };

    PageSnapshot {
        url,
        title,
        text: body_text,
        links,
        forms,
        accessibility_tree,
        screenshot_base64_jpeg: None,
    }
}

fn parse_extraction(value: Value) -> Option<RawExtraction> {
    serde_json::from_value(value).ok()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Capture the accessibility tree rooted at `body` as YAML, bounded to
/// `MAX_AX_TREE_CHARS`. Failure is non-fatal — returns `None` (§4.3).
async fn capture_ax_tree_yaml(page: &DriverPage) -> Option<String> {
    let tree = page.accessibility_tree().await.ok()?;
    let yaml = serde_yaml::to_string(&tree).ok()?;
    Some(truncate_chars(&yaml, MAX_AX_TREE_CHARS))
}

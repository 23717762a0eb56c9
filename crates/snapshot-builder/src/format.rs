//! Render a [`PageSnapshot`] into the fixed section layout the Prompt
//! Builder (C7) interpolates into the user message (§4.3 "Format for LLM").

use std::fmt::Write as _;

use auspex_core_types::PageSnapshot;

use crate::noise::truncate_url_for_display;

pub fn format_snapshot(snapshot: &PageSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## Current Page");
    let _ = writeln!(out, "URL: {}", truncate_url_for_display(&snapshot.url));
    let _ = writeln!(out, "Title: {}", snapshot.title);
    out.push('\n');

    let _ = writeln!(out, "### Page Text");
    if snapshot.text.is_empty() {
        let _ = writeln!(out, "(no text content)");
    } else {
        let _ = writeln!(out, "{}", snapshot.text);
    }
    out.push('\n');

    let _ = writeln!(out, "### Links ({})", snapshot.links.len());
    for link in &snapshot.links {
        let _ = writeln!(
            out,
            "[{}] {} -> {}",
            link.index,
            link.text,
            truncate_url_for_display(&link.href)
        );
    }
    out.push('\n');

    let _ = writeln!(out, "### Forms ({})", snapshot.forms.len());
    for (i, form) in snapshot.forms.iter().enumerate() {
        let _ = writeln!(out, "Form {i}:");
        for input in &form.inputs {
            let _ = writeln!(
                out,
                "  - {} ({}) placeholder=\"{}\" selector=\"{}\"",
                input.name, input.input_type, input.placeholder, input.selector
            );
        }
    }

    if let Some(tree) = &snapshot.accessibility_tree {
        out.push('\n');
        let _ = writeln!(out, "### Accessibility Tree");
        let _ = writeln!(out, "{tree}");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use auspex_core_types::{FormInfo, InputInfo, LinkInfo};

    #[test]
    fn renders_all_fixed_sections() {
        let snap = PageSnapshot {
            url: "https://example.com/".into(),
            title: "Example".into(),
            text: "hello".into(),
            links: vec![LinkInfo {
                text: "go".into(),
                href: "https://example.com/a".into(),
                index: 0,
            }],
            forms: vec![FormInfo {
                inputs: vec![InputInfo {
                    name: "q".into(),
                    input_type: "text".into(),
                    placeholder: "".into(),
                    selector: "#q".into(),
                }],
            }],
            accessibility_tree: None,
            screenshot_base64_jpeg: None,
        };
        let rendered = format_snapshot(&snap);
        assert!(rendered.contains("## Current Page"));
        assert!(rendered.contains("### Page Text"));
        assert!(rendered.contains("### Links (1)"));
        assert!(rendered.contains("### Forms (1)"));
        assert!(!rendered.contains("### Accessibility Tree"));
    }
}

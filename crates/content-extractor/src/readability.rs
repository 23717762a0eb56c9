//! A Readability-style scoring pass (§4.4): score paragraph-bearing
//! ancestors by text density and pick the highest-scoring candidate.
//! `char_threshold = 50`; the caller rejects the result if the winning
//! candidate's text is under 100 chars and falls back to the heuristic pass.

use std::collections::HashMap;

use ego_tree::NodeId;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

const CHAR_THRESHOLD: usize = 50;
const MIN_TEXT_CONTENT: usize = 100;

static PARAGRAPH_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("p, pre, td").unwrap());

/// Returns the highest-scoring candidate element's inner HTML and text, or
/// `None` if no candidate clears `MIN_TEXT_CONTENT`.
pub fn extract_readability(document: &Html) -> Option<(String, String)> {
    let mut scores: HashMap<NodeId, f64> = HashMap::new();

    for para in document.select(&PARAGRAPH_SEL) {
        let text = para.text().collect::<String>();
        let len = text.trim().chars().count();
        if len < CHAR_THRESHOLD {
            continue;
        }
        let comma_bonus = text.matches(',').count() as f64;
        let length_bonus = ((len / 100) as f64).min(3.0);
        let points = 1.0 + comma_bonus + length_bonus;

        // Award the parent the full score, the grandparent half — the
        // classic Readability heuristic for "this cluster of paragraphs
        // probably lives inside the real content container".
        if let Some(parent) = para.parent().and_then(ElementRef::wrap) {
            *scores.entry(parent.id()).or_insert(0.0) += points;
            if let Some(grandparent) = parent.parent().and_then(ElementRef::wrap) {
                *scores.entry(grandparent.id()).or_insert(0.0) += points / 2.0;
            }
        }
    }

    let best_id = scores
        .into_iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(id, _)| id)?;

    let best = ElementRef::wrap(document.tree.get(best_id)?)?;
    let text = best.text().collect::<String>();
    let trimmed_len = text.split_whitespace().collect::<Vec<_>>().join(" ").len();
    if trimmed_len < MIN_TEXT_CONTENT {
        return None;
    }
    Some((best.inner_html(), text))
}

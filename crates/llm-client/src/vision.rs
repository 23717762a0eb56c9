//! Vision-capability model whitelist (§4.6): prefix match, case-insensitive.

use dashmap::DashSet;
use once_cell::sync::Lazy;
use tracing::warn;

const VISION_MODEL_PREFIXES: &[&str] = &[
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-4-turbo",
    "gpt-4.1",
    "gpt-4.1-mini",
    "gpt-4.1-nano",
    "meta-llama/llama-4-scout",
    "meta-llama/llama-4-maverick",
];

/// Whether `model` is capable of taking an image attachment, per the fixed
/// whitelist. Vision *availability* also requires the config flag to be on;
/// that check lives with the caller.
pub fn is_vision_model(model: &str) -> bool {
    let lower = model.to_ascii_lowercase();
    VISION_MODEL_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(&prefix.to_ascii_lowercase()))
}

/// Process-wide "already warned" memo (SPEC_FULL.md §B) so that a caller who
/// enables `config.vision` against a non-whitelisted model gets one log line
/// per model instead of one per run.
static WARNED_MODELS: Lazy<DashSet<String>> = Lazy::new(DashSet::new);

/// Checks vision availability for `model` and, if the caller wants vision
/// but the model isn't whitelisted, emits a one-time warning for that model.
/// Returns the same value as [`is_vision_model`] so callers can use it as a
/// drop-in availability check.
pub fn check_vision_availability(model: &str, wants_vision: bool) -> bool {
    let available = is_vision_model(model);
    if wants_vision && !available && WARNED_MODELS.insert(model.to_string()) {
        warn!(model, "vision requested but model is not on the vision whitelist; continuing without it");
    }
    available
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_whitelisted_prefixes_case_insensitively() {
        assert!(is_vision_model("gpt-4o"));
        assert!(is_vision_model("GPT-4O-2024-08-06"));
        assert!(is_vision_model("gpt-4.1-nano-preview"));
        assert!(is_vision_model("meta-llama/Llama-4-Scout-17B"));
    }

    #[test]
    fn rejects_non_whitelisted_models() {
        assert!(!is_vision_model("gpt-3.5-turbo"));
        assert!(!is_vision_model("claude-3-opus"));
        assert!(!is_vision_model(""));
    }
}

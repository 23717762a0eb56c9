//! Selector validation (§3 "Selector") and role-locator parsing (§4.10),
//! shared by the validator and the action executor.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ActionSchemaError;

pub const MAX_SELECTOR_CHARS: usize = 500;

static ROLE_SELECTOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^role=(\w+)(?:\[name="(.*)"\])?$"#).expect("valid regex"));

static ON_EVENT_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bon[a-z]+\s*=").expect("valid regex"));

/// Validate a raw selector string against §3's bounds and blacklist. Role
/// selectors (`role=...`) are exempt from the CSS blacklist — they are
/// trusted once they match the regex.
pub fn validate_selector(raw: &str) -> Result<String, ActionSchemaError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ActionSchemaError::Field {
            field: "selector".into(),
            reason: "must not be empty".into(),
        });
    }
    if trimmed.chars().count() > MAX_SELECTOR_CHARS {
        return Err(ActionSchemaError::Field {
            field: "selector".into(),
            reason: format!("must be at most {MAX_SELECTOR_CHARS} characters"),
        });
    }

    if is_role_selector(trimmed) {
        return Ok(trimmed.to_string());
    }

    let lower = trimmed.to_ascii_lowercase();
    if lower.contains("javascript:")
        || lower.contains("<script")
        || lower.contains("data:")
        || ON_EVENT_ATTR.is_match(trimmed)
    {
        return Err(ActionSchemaError::Field {
            field: "selector".into(),
            reason: "contains a disallowed pattern".into(),
        });
    }

    Ok(trimmed.to_string())
}

pub fn is_role_selector(selector: &str) -> bool {
    ROLE_SELECTOR.is_match(selector)
}

/// Parse a `role=<word>[name="..."]` selector into `(role, name)`, unescaping
/// `\"` within the name. Per §9 open questions, other escapes (`\\`, `\n`)
/// are left as-is — the source this was distilled from only handles `\"`.
pub fn parse_role_selector(selector: &str) -> Option<(String, Option<String>)> {
    let caps = ROLE_SELECTOR.captures(selector)?;
    let role = caps.get(1)?.as_str().to_string();
    let name = caps
        .get(2)
        .map(|m| m.as_str().replace("\\\"", "\""));
    Some((role, name))
}

//! Exhaustive discriminated parse of raw LLM JSON into `AgentAction` (§4.2).

use auspex_core_types::{AgentAction, AllowedKey, ScrollDirection, Selector};
use serde_json::Value;

use crate::errors::ActionSchemaError;
use crate::selector::validate_selector;

const MAX_TYPE_TEXT_CHARS: usize = 1_000;
const MAX_SELECT_VALUE_CHARS: usize = 500;
const MAX_DONE_RESULT_CHARS: usize = 50_000;
const MIN_WAIT_MS: u64 = 1;
const MAX_WAIT_MS: u64 = 5_000;
const MIN_SCROLL_AMOUNT: u64 = 1;
const MAX_SCROLL_AMOUNT: u64 = 5_000;
const DEFAULT_SCROLL_AMOUNT: u32 = 500;

/// Parse and validate a raw action object against the §3 vocabulary.
pub fn parse(raw: &Value) -> Result<AgentAction, ActionSchemaError> {
    let obj = raw.as_object().ok_or(ActionSchemaError::NotAnObject)?;
    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ActionSchemaError::MissingType)?;

    let allowed_keys: &[&str] = match kind {
        "click" | "hover" => &["type", "selector"],
        "type" => &["type", "selector", "text"],
        "select" => &["type", "selector", "value"],
        "pressKey" => &["type", "key"],
        "goto" => &["type", "url"],
        "wait" => &["type", "ms"],
        "scroll" => &["type", "direction", "amount"],
        "done" => &["type", "result"],
        other => return Err(ActionSchemaError::UnknownType(other.to_string())),
    };
    for key in obj.keys() {
        if !allowed_keys.contains(&key.as_str()) {
            return Err(ActionSchemaError::UnknownField(key.clone()));
        }
    }

    match kind {
        "click" => Ok(AgentAction::Click {
            selector: selector_field(obj, "selector")?,
        }),
        "hover" => Ok(AgentAction::Hover {
            selector: selector_field(obj, "selector")?,
        }),
        "type" => {
            let selector = selector_field(obj, "selector")?;
            let text = string_field(obj, "text")?;
            if text.chars().count() > MAX_TYPE_TEXT_CHARS {
                return Err(bound_error("text", MAX_TYPE_TEXT_CHARS));
            }
            Ok(AgentAction::Type { selector, text })
        }
        "select" => {
            let selector = selector_field(obj, "selector")?;
            let value = string_field(obj, "value")?;
            if value.chars().count() > MAX_SELECT_VALUE_CHARS {
                return Err(bound_error("value", MAX_SELECT_VALUE_CHARS));
            }
            Ok(AgentAction::Select { selector, value })
        }
        "pressKey" => {
            let raw_key = string_field(obj, "key")?;
            let key = AllowedKey::parse(&raw_key).ok_or_else(|| ActionSchemaError::Field {
                field: "key".into(),
                reason: format!("'{raw_key}' is not an allowed key"),
            })?;
            Ok(AgentAction::PressKey { key })
        }
        "goto" => Ok(AgentAction::Goto {
            url: string_field(obj, "url")?,
        }),
        "wait" => {
            let ms = u64_field(obj, "ms")?;
            if !(MIN_WAIT_MS..=MAX_WAIT_MS).contains(&ms) {
                return Err(ActionSchemaError::Field {
                    field: "ms".into(),
                    reason: format!("must be between {MIN_WAIT_MS} and {MAX_WAIT_MS}"),
                });
            }
            Ok(AgentAction::Wait { ms: ms as u32 })
        }
        "scroll" => {
            let raw_direction = string_field(obj, "direction")?;
            let direction = match raw_direction.as_str() {
                "up" => ScrollDirection::Up,
                "down" => ScrollDirection::Down,
                other => {
                    return Err(ActionSchemaError::Field {
                        field: "direction".into(),
                        reason: format!("'{other}' must be 'up' or 'down'"),
                    })
                }
            };
            let amount = match obj.get("amount") {
                None | Some(Value::Null) => None,
                Some(v) => {
                    let amount = v.as_u64().ok_or_else(|| ActionSchemaError::Field {
                        field: "amount".into(),
                        reason: "must be an integer".into(),
                    })?;
                    if !(MIN_SCROLL_AMOUNT..=MAX_SCROLL_AMOUNT).contains(&amount) {
                        return Err(ActionSchemaError::Field {
                            field: "amount".into(),
                            reason: format!(
                                "must be between {MIN_SCROLL_AMOUNT} and {MAX_SCROLL_AMOUNT}"
                            ),
                        });
                    }
                    Some(amount as u32)
                }
            };
            Ok(AgentAction::Scroll { direction, amount })
        }
        "done" => {
            let result = string_field(obj, "result")?;
            if result.chars().count() > MAX_DONE_RESULT_CHARS {
                return Err(bound_error("result", MAX_DONE_RESULT_CHARS));
            }
            Ok(AgentAction::Done { result })
        }
        other => Err(ActionSchemaError::UnknownType(other.to_string())),
    }
}

/// The default scroll amount, applied by the executor when the LLM omits it.
pub fn default_scroll_amount() -> u32 {
    DEFAULT_SCROLL_AMOUNT
}

fn bound_error(field: &str, max: usize) -> ActionSchemaError {
    ActionSchemaError::Field {
        field: field.into(),
        reason: format!("must be at most {max} characters"),
    }
}

fn string_field(
    obj: &serde_json::Map<String, Value>,
    field: &str,
) -> Result<String, ActionSchemaError> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ActionSchemaError::Field {
            field: field.into(),
            reason: "missing or not a string".into(),
        })
}

fn u64_field(
    obj: &serde_json::Map<String, Value>,
    field: &str,
) -> Result<u64, ActionSchemaError> {
    obj.get(field)
        .and_then(Value::as_u64)
        .ok_or_else(|| ActionSchemaError::Field {
            field: field.into(),
            reason: "missing or not an integer".into(),
        })
}

fn selector_field(
    obj: &serde_json::Map<String, Value>,
    field: &str,
) -> Result<Selector, ActionSchemaError> {
    let raw = string_field(obj, field)?;
    validate_selector(&raw).map(Selector)
}

/// Render an action back to its canonical JSON form — the inverse of
/// [`parse`], used for history round-tripping.
pub fn format(action: &AgentAction) -> Value {
    serde_json::to_value(action).expect("AgentAction always serializes")
}

/// A canonicalized JSON string for an action, used for loop-detection
/// deduplication (§9 "Action key"). `serde_json::to_string` already produces
/// a single, deterministic quote style and no incidental whitespace, so this
/// is just the compact serialization.
pub fn action_key(action: &AgentAction) -> String {
    serde_json::to_string(&format(action)).expect("value always serializes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roundtrip(action: AgentAction) {
        let formatted = format(&action);
        let parsed = parse(&formatted).expect("reparse");
        assert_eq!(parsed, action);
    }

    #[test]
    fn parses_every_action_kind() {
        assert!(parse(&json!({"type": "click", "selector": "#go"})).is_ok());
        assert!(parse(&json!({"type": "type", "selector": "#q", "text": "hi"})).is_ok());
        assert!(parse(&json!({"type": "select", "selector": "#s", "value": "a"})).is_ok());
        assert!(parse(&json!({"type": "pressKey", "key": "Enter"})).is_ok());
        assert!(parse(&json!({"type": "hover", "selector": "#h"})).is_ok());
        assert!(parse(&json!({"type": "goto", "url": "https://example.com"})).is_ok());
        assert!(parse(&json!({"type": "wait", "ms": 500})).is_ok());
        assert!(parse(&json!({"type": "scroll", "direction": "down"})).is_ok());
        assert!(parse(&json!({"type": "done", "result": "ok"})).is_ok());
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(parse(&json!({"type": "teleport"})).is_err());
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(parse(&json!({"type": "click", "selector": "#go", "extra": 1})).is_err());
    }

    #[test]
    fn enforces_bounds() {
        assert!(parse(&json!({"type": "wait", "ms": 0})).is_err());
        assert!(parse(&json!({"type": "wait", "ms": 10_000})).is_err());
        assert!(parse(&json!({"type": "scroll", "direction": "down", "amount": 6000})).is_err());
        let long_result = "x".repeat(51_000);
        assert!(parse(&json!({"type": "done", "result": long_result})).is_err());
        assert!(parse(&json!({"type": "click", "selector": ""})).is_err());
        assert!(parse(&json!({"type": "click", "selector": "javascript:x"})).is_err());
        let long_selector = "a".repeat(600);
        assert!(parse(&json!({"type": "click", "selector": long_selector})).is_err());
        assert!(parse(&json!({"type": "pressKey", "key": "Ctrl"})).is_err());
    }

    #[test]
    fn accepts_every_allowed_key() {
        for key in AllowedKey::ALL {
            let v = json!({"type": "pressKey", "key": key.as_str()});
            assert!(parse(&v).is_ok(), "{} should be accepted", key.as_str());
        }
    }

    #[test]
    fn accepts_role_selectors() {
        let v = json!({"type": "click", "selector": "role=button[name=\"Submit\"]"});
        assert!(parse(&v).is_ok());
    }

    #[test]
    fn round_trips_every_variant() {
        roundtrip(AgentAction::Click {
            selector: Selector("#go".into()),
        });
        roundtrip(AgentAction::Wait { ms: 250 });
        roundtrip(AgentAction::Scroll {
            direction: ScrollDirection::Up,
            amount: Some(400),
        });
        roundtrip(AgentAction::Done {
            result: "done here".into(),
        });
    }
}

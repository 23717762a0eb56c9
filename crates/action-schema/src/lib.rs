//! Action Validator (C2): turns raw LLM JSON into a bounds-checked
//! [`auspex_core_types::AgentAction`], and back again for history display.

mod errors;
mod parse;
mod selector;

pub use errors::ActionSchemaError;
pub use parse::{action_key, default_scroll_amount, format, parse};
pub use selector::{is_role_selector, parse_role_selector, validate_selector, MAX_SELECTOR_CHARS};

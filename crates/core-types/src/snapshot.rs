//! Bounded page-view types produced by the Snapshot Builder (C3) and
//! consumed by the Prompt Builder (C7).

#[cfg(feature = "serde-full")]
use serde::{Deserialize, Serialize};

pub const MAX_BODY_TEXT_CHARS: usize = 3_500;
pub const MAX_LINKS: usize = 25;
pub const MAX_LINK_TEXT_CHARS: usize = 80;
pub const MAX_FORMS: usize = 5;
pub const MAX_INPUTS_PER_FORM: usize = 10;
pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_AX_TREE_CHARS: usize = 3_000;

#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkInfo {
    pub text: String,
    pub href: String,
    pub index: usize,
}

#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputInfo {
    pub name: String,
    pub input_type: String,
    pub placeholder: String,
    pub selector: String,
}

#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FormInfo {
    pub inputs: Vec<InputInfo>,
}

/// A bounded, token-economical rendering of a page, shared by the static
/// (raw HTML) and live (browser) snapshot modes.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct PageSnapshot {
    pub url: String,
    pub title: String,
    pub text: String,
    pub links: Vec<LinkInfo>,
    pub forms: Vec<FormInfo>,
    pub accessibility_tree: Option<String>,
    pub screenshot_base64_jpeg: Option<String>,
}

impl PageSnapshot {
    /// A minimal snapshot used when live extraction fails twice in a row
    /// (§4.3) — the loop must still be able to continue.
    pub fn minimal(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            title: url.clone(),
            url,
            text: String::new(),
            links: Vec::new(),
            forms: Vec::new(),
            accessibility_tree: None,
            screenshot_base64_jpeg: None,
        }
    }
}

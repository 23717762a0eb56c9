//! The exhaustive set of actions the interactive loop can dispatch.
//!
//! This module only carries the data shapes (§3 AgentAction). Parsing raw LLM
//! output into these types, and enforcing the string-length/range invariants,
//! is the job of `auspex-action-schema` (C2) — keeping the two concerns apart
//! mirrors the split between `core-types` and `policy-center` upstream.

#[cfg(feature = "serde-full")]
use serde::{Deserialize, Serialize};

/// A CSS selector or `role=...` selector string. Bounds/charset are enforced
/// by the action validator, not by this type.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Selector(pub String);

impl Selector {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of keys the `pressKey` action may dispatch.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AllowedKey {
    Enter,
    Tab,
    Escape,
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

impl AllowedKey {
    pub const ALL: &'static [AllowedKey] = &[
        AllowedKey::Enter,
        AllowedKey::Tab,
        AllowedKey::Escape,
        AllowedKey::Backspace,
        AllowedKey::Delete,
        AllowedKey::ArrowUp,
        AllowedKey::ArrowDown,
        AllowedKey::ArrowLeft,
        AllowedKey::ArrowRight,
        AllowedKey::Home,
        AllowedKey::End,
        AllowedKey::PageUp,
        AllowedKey::PageDown,
        AllowedKey::Space,
        AllowedKey::F1,
        AllowedKey::F2,
        AllowedKey::F3,
        AllowedKey::F4,
        AllowedKey::F5,
        AllowedKey::F6,
        AllowedKey::F7,
        AllowedKey::F8,
        AllowedKey::F9,
        AllowedKey::F10,
        AllowedKey::F11,
        AllowedKey::F12,
    ];

    /// Canonical wire name, matching what a Playwright-style `keyboard.press`
    /// call expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            AllowedKey::Enter => "Enter",
            AllowedKey::Tab => "Tab",
            AllowedKey::Escape => "Escape",
            AllowedKey::Backspace => "Backspace",
            AllowedKey::Delete => "Delete",
            AllowedKey::ArrowUp => "ArrowUp",
            AllowedKey::ArrowDown => "ArrowDown",
            AllowedKey::ArrowLeft => "ArrowLeft",
            AllowedKey::ArrowRight => "ArrowRight",
            AllowedKey::Home => "Home",
            AllowedKey::End => "End",
            AllowedKey::PageUp => "PageUp",
            AllowedKey::PageDown => "PageDown",
            AllowedKey::Space => "Space",
            AllowedKey::F1 => "F1",
            AllowedKey::F2 => "F2",
            AllowedKey::F3 => "F3",
            AllowedKey::F4 => "F4",
            AllowedKey::F5 => "F5",
            AllowedKey::F6 => "F6",
            AllowedKey::F7 => "F7",
            AllowedKey::F8 => "F8",
            AllowedKey::F9 => "F9",
            AllowedKey::F10 => "F10",
            AllowedKey::F11 => "F11",
            AllowedKey::F12 => "F12",
        }
    }

    /// Case-insensitive lookup against the canonical name.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(raw))
    }
}

/// Scroll direction for the `scroll` action.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// The exhaustive, tagged action vocabulary (§3). Exactly one variant is
/// produced per LLM turn.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde-full",
    serde(tag = "type", rename_all = "camelCase", deny_unknown_fields)
)]
#[derive(Clone, Debug, PartialEq)]
pub enum AgentAction {
    Click { selector: Selector },
    Type { selector: Selector, text: String },
    Select { selector: Selector, value: String },
    PressKey { key: AllowedKey },
    Hover { selector: Selector },
    Goto { url: String },
    Wait { ms: u32 },
    Scroll {
        direction: ScrollDirection,
        #[cfg_attr(feature = "serde-full", serde(default))]
        amount: Option<u32>,
    },
    Done { result: String },
}

impl AgentAction {
    /// The `type` discriminant, as it would appear on the wire. Used for
    /// history formatting and for loop-detection's action key.
    pub fn kind(&self) -> &'static str {
        match self {
            AgentAction::Click { .. } => "click",
            AgentAction::Type { .. } => "type",
            AgentAction::Select { .. } => "select",
            AgentAction::PressKey { .. } => "pressKey",
            AgentAction::Hover { .. } => "hover",
            AgentAction::Goto { .. } => "goto",
            AgentAction::Wait { .. } => "wait",
            AgentAction::Scroll { .. } => "scroll",
            AgentAction::Done { .. } => "done",
        }
    }

    /// Actions that self-time their own wait and should not receive the
    /// inter-iteration delay (§4.6 step 15).
    pub fn is_self_timed(&self) -> bool {
        matches!(self, AgentAction::Wait { .. } | AgentAction::Goto { .. })
    }
}

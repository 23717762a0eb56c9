//! Property-based round-trip test for §8: `parse(format(a)) == a` for every
//! valid `AgentAction`, not just the hand-picked cases in `parse.rs`'s own
//! unit tests.

use auspex_action_schema::{format, parse};
use auspex_core_types::{AgentAction, AllowedKey, ScrollDirection, Selector};
use proptest::prelude::*;

fn css_selector() -> impl Strategy<Value = String> {
    "[#.a-zA-Z][a-zA-Z0-9_-]{0,30}".prop_map(|s| s)
}

fn allowed_key() -> impl Strategy<Value = AllowedKey> {
    (0..AllowedKey::ALL.len()).prop_map(|i| AllowedKey::ALL[i])
}

fn scroll_direction() -> impl Strategy<Value = ScrollDirection> {
    prop_oneof![Just(ScrollDirection::Up), Just(ScrollDirection::Down)]
}

fn agent_action() -> impl Strategy<Value = AgentAction> {
    prop_oneof![
        css_selector().prop_map(|s| AgentAction::Click { selector: Selector(s) }),
        css_selector().prop_map(|s| AgentAction::Hover { selector: Selector(s) }),
        (css_selector(), "[^\"\\\\]{0,50}").prop_map(|(selector, text)| AgentAction::Type {
            selector: Selector(selector),
            text,
        }),
        (css_selector(), "[^\"\\\\]{0,50}").prop_map(|(selector, value)| AgentAction::Select {
            selector: Selector(selector),
            value,
        }),
        allowed_key().prop_map(|key| AgentAction::PressKey { key }),
        "https://[a-z]{3,10}\\.test/[a-z0-9/]{0,20}".prop_map(|url| AgentAction::Goto { url }),
        (1u32..=5_000u32).prop_map(|ms| AgentAction::Wait { ms }),
        (scroll_direction(), prop::option::of(1u32..=5_000u32))
            .prop_map(|(direction, amount)| AgentAction::Scroll { direction, amount }),
        "[^\"\\\\]{0,100}".prop_map(|result| AgentAction::Done { result }),
    ]
}

proptest! {
    #[test]
    fn parse_format_is_identity(action in agent_action()) {
        let wire = format(&action);
        let parsed = parse(&wire).expect("a value produced by `format` must re-parse");
        prop_assert_eq!(parsed, action);
    }
}

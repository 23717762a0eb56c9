//! Observer events (SPEC_FULL.md §B): lets a caller stream progress from a
//! run without threading a channel through every layer. Events fire
//! synchronously, in iteration order, on the same thread of control that
//! drives the loop (§5 "Ordering guarantees") — a no-op observer costs
//! nothing beyond the virtual dispatch.

use auspex_core_types::{ActionRecord, ResultData, Tier};

/// One tick of run progress. Fields are borrowed references where the
/// underlying data outlives the call; observers that need to keep a copy
/// should clone what they need.
pub enum ObserverEvent<'a> {
    Tier(Tier),
    Iteration { index: u32, url: &'a str },
    Action(&'a ActionRecord),
    Done { tier: Tier, data: Option<&'a ResultData> },
    Error(&'a str),
}

/// A sink for [`ObserverEvent`]s. The default implementation ignores
/// everything, so a caller only overrides the events it cares about.
pub trait Observer: Send {
    fn on_event(&mut self, event: ObserverEvent<'_>) {
        let _ = event;
    }
}

/// The observer used when a caller doesn't supply one.
pub struct NullObserver;

impl Observer for NullObserver {
    fn on_event(&mut self, _event: ObserverEvent<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_observer_accepts_every_event_variant() {
        let mut observer = NullObserver;
        observer.on_event(ObserverEvent::Tier(Tier::Http));
        observer.on_event(ObserverEvent::Iteration { index: 0, url: "https://example.com/" });
        observer.on_event(ObserverEvent::Done { tier: Tier::Http, data: None });
        observer.on_event(ObserverEvent::Error("boom"));
    }
}

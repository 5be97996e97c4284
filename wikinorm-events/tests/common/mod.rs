//! Helpers shared by the integration tests.

use wikinorm_events::ir::events::{listing, Event};
use wikinorm_events::syntaxes::{RecordedEventsParser, SketchParser};
use wikinorm_events::{NormalizeError, Normalizer};

/// Normalizes sketch source with the default resolvers.
pub fn sketch(source: &str) -> Vec<Event> {
    Normalizer::new(&SketchParser)
        .with_default_resolvers()
        .normalize_to_events(source)
        .expect("sketch source should normalize")
}

/// The listing of everything between the document start and end.
pub fn body(source: &str) -> String {
    let events = sketch(source);
    assert!(matches!(events.first(), Some(Event::StartDocument(_))));
    assert!(matches!(events.last(), Some(Event::EndDocument(_))));
    listing(&events[1..events.len() - 1])
}

/// Replays a recorded raw event stream, keeping whatever was emitted before a failure.
pub fn replay(json: &str) -> (Vec<Event>, Result<(), NormalizeError>) {
    let mut events = Vec::new();
    let result = Normalizer::new(&RecordedEventsParser)
        .with_default_resolvers()
        .normalize(json, &mut events);
    (events, result)
}

//! Re-entrant parsing of link and image labels.
//!
//! Grammars hand link labels over as unparsed text (`[[**bold** label>>Main.Home]]`
//! arrives as the string `**bold** label`). The label is parsed again, inline, with
//! the same source parser and normalized by a nested [`EventNormalizer`].
//!
//! Inline entry points of wiki grammars are unreliable about leading content: a label
//! starting with `* ` or `= ` would be taken for a list or a header. The label is
//! therefore prefixed with a marker word and a space, and [`LabelFilter`] removes the
//! marker again together with the document and paragraph wrapping the grammar adds.
//!
//! Grammars without an inline entry point parse the label as a whole document, so a
//! label line may come back as a section with a header. Labels are inline content:
//! section and header boundaries are dropped and only their content is kept.

use crate::error::ParseFailure;
use crate::ir::events::Event;
use crate::listener::Listener;
use crate::normalizer::{Collaborators, EventNormalizer, NormalizerOptions};

/// Parses label text into inline events.
pub struct InlineLabelReparser<'a> {
    collaborators: Collaborators<'a>,
    options: &'a NormalizerOptions,
}

impl<'a> InlineLabelReparser<'a> {
    pub fn new(collaborators: Collaborators<'a>, options: &'a NormalizerOptions) -> Self {
        Self {
            collaborators,
            options,
        }
    }

    /// Returns the inline events of `label`, or nothing for an empty label.
    ///
    /// Events are collected first and only returned when the whole label parsed, so a
    /// failure never leaves half a label behind.
    pub fn reparse(&self, label: &str) -> Result<Vec<Event>, ParseFailure> {
        if label.is_empty() {
            return Ok(Vec::new());
        }

        let source = format!("{} {label}", self.options.label_marker);
        let mut filter = LabelFilter::new(&self.options.label_marker);
        {
            // Own id generator, and no header survives the filter: labels neither
            // consume nor produce ids of the outer document.
            let mut nested =
                EventNormalizer::new(self.collaborators, self.options.clone(), &mut filter);
            self.collaborators.parser.parse_inline(&source, &mut nested)?;
            nested.finish()?;
        }
        Ok(filter.into_events())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Expected,
    SpaceExpected,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wrapper {
    NotSeen,
    Open,
    Closed,
}

/// Strips the synthetic framing around a reparsed label.
///
/// Removed: every document, section and header boundary, the first top-level
/// paragraph with its end, a leading marker word and one space right after it.
/// Everything else passes through in order.
#[derive(Debug)]
pub struct LabelFilter {
    marker: String,
    events: Vec<Event>,
    nesting: usize,
    wrapper: Wrapper,
    state: Marker,
}

impl LabelFilter {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            events: Vec::new(),
            nesting: 0,
            wrapper: Wrapper::NotSeen,
            state: Marker::Expected,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    fn strip_marker(&mut self, event: &Event) -> bool {
        match (self.state, event) {
            (Marker::Expected, Event::Word(word)) if *word == self.marker => {
                self.state = Marker::SpaceExpected;
                true
            }
            (Marker::SpaceExpected, Event::Space) => {
                self.state = Marker::Done;
                true
            }
            (Marker::Done, _) => false,
            _ => {
                self.state = Marker::Done;
                false
            }
        }
    }
}

impl Listener for LabelFilter {
    fn on_event(&mut self, event: Event) {
        match &event {
            Event::StartDocument(_)
            | Event::EndDocument(_)
            | Event::StartSection(_)
            | Event::EndSection(_)
            | Event::StartHeader { .. }
            | Event::EndHeader { .. } => return,
            Event::StartParagraph(_) if self.nesting == 0 && self.wrapper == Wrapper::NotSeen => {
                self.wrapper = Wrapper::Open;
                return;
            }
            Event::EndParagraph(_) if self.nesting == 0 && self.wrapper == Wrapper::Open => {
                self.wrapper = Wrapper::Closed;
                return;
            }
            _ => {}
        }

        if self.strip_marker(&event) {
            return;
        }

        if event.is_start() {
            self.nesting += 1;
        } else if event.is_end() {
            self.nesting = self.nesting.saturating_sub(1);
        }
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::events::{listing, Format};
    use crate::ir::parameters::Parameters;
    use crate::ir::raw::{RawEvent, WikiParameters};
    use crate::parser::{RawListener, SourceEventParser};
    use crate::syntaxes::sketch::SketchParser;

    fn options() -> NormalizerOptions {
        NormalizerOptions::default()
    }

    fn reparse(label: &str) -> Result<Vec<Event>, ParseFailure> {
        let options = options();
        let collaborators = Collaborators::new(&SketchParser);
        InlineLabelReparser::new(collaborators, &options).reparse(label)
    }

    #[test]
    fn plain_label_yields_single_word() {
        let events = reparse("hello").unwrap();
        assert_eq!(events, vec![Event::Word("hello".into())]);
    }

    #[test]
    fn empty_label_yields_nothing() {
        assert!(reparse("").unwrap().is_empty());
    }

    #[test]
    fn label_markup_is_normalized() {
        let events = reparse("**big** news").unwrap();
        assert_eq!(
            listing(&events),
            "StartFormat(bold)\nWord(big)\nEndFormat(bold)\nSpace\nWord(news)"
        );
    }

    #[test]
    fn block_looking_label_stays_inline() {
        let events = reparse("* not a list").unwrap();
        assert_eq!(events[0], Event::SpecialSymbol('*'));
        assert!(!events.iter().any(|e| matches!(e, Event::StartList { .. })));
    }

    #[test]
    fn parse_failure_is_reported() {
        assert!(reparse("[[broken").is_err());
    }

    #[test]
    fn filter_keeps_inner_paragraphs() {
        let mut filter = LabelFilter::new("m");
        for event in [
            Event::StartDocument(Parameters::new()),
            Event::StartParagraph(Parameters::new()),
            Event::Word("m".into()),
            Event::Space,
            Event::StartFormat {
                format: Format::Italic,
                parameters: Parameters::new(),
            },
            Event::Word("x".into()),
            Event::EndFormat {
                format: Format::Italic,
                parameters: Parameters::new(),
            },
            Event::EndParagraph(Parameters::new()),
            Event::StartParagraph(Parameters::new()),
            Event::Word("y".into()),
            Event::EndParagraph(Parameters::new()),
            Event::EndDocument(Parameters::new()),
        ] {
            filter.on_event(event);
        }
        assert_eq!(
            listing(filter.events()),
            "StartFormat(italic)\nWord(x)\nEndFormat(italic)\nStartParagraph\nWord(y)\nEndParagraph"
        );
    }

    #[test]
    fn filter_unwraps_headers() {
        let mut filter = LabelFilter::new("m");
        for event in [
            Event::Word("x".into()),
            Event::StartSection(Parameters::new()),
            Event::StartHeader {
                level: 1,
                id: "HIntro".into(),
                parameters: Parameters::new(),
            },
            Event::Word("Intro".into()),
            Event::EndHeader {
                level: 1,
                id: "HIntro".into(),
                parameters: Parameters::new(),
            },
            Event::EndSection(Parameters::new()),
        ] {
            filter.on_event(event);
        }
        assert_eq!(listing(filter.events()), "Word(x)\nWord(Intro)");
    }

    #[test]
    fn filter_only_drops_the_marker_word() {
        let mut filter = LabelFilter::new("m");
        filter.on_event(Event::Word("other".into()));
        filter.on_event(Event::Space);
        assert_eq!(filter.events().len(), 2);
    }

    struct Failing;

    impl SourceEventParser for Failing {
        fn syntax(&self) -> &str {
            "failing/1.0"
        }

        fn parse(&self, _source: &str, listener: &mut dyn RawListener) -> Result<(), ParseFailure> {
            listener.on_raw(RawEvent::BeginDocument(WikiParameters::new()));
            listener.on_raw(RawEvent::Word("partial".into()));
            Err(ParseFailure::grammar("failing/1.0", "always fails"))
        }
    }

    #[test]
    fn failed_label_returns_no_partial_output() {
        let options = options();
        let result = InlineLabelReparser::new(Collaborators::new(&Failing), &options).reparse("x");
        assert!(result.is_err());
    }
}

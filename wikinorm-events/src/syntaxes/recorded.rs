//! The `events/json` syntax: replays a recorded raw event stream.
//!
//! The source is a JSON array of [`RawEvent`]s, exactly as serde writes them. This is
//! how streams produced by external grammars are captured and replayed through the
//! normalizer, e.g. for regression fixtures.
//!
//! Labels inside recorded references are plain text; they are reparsed with the
//! `sketch/1.0` inline grammar.
//!
//! A recording is checked for balance before anything is replayed. Unbalanced
//! documents, headers or formats are fatal inside the normalizer; here they are
//! a rejected input.

use crate::common::format_stack::{FormatStack, StyleTable};
use crate::error::ParseFailure;
use crate::ir::events::Event;
use crate::ir::raw::{RawEvent, WikiParameters};
use crate::listener::Listener;
use crate::normalizer::ID_EXTENSION;
use crate::parser::{RawListener, SourceEventParser};
use crate::syntaxes::sketch::SketchParser;

pub const SYNTAX: &str = "events/json";

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordedEventsParser;

impl SourceEventParser for RecordedEventsParser {
    fn syntax(&self) -> &str {
        SYNTAX
    }

    fn description(&self) -> &str {
        "Recorded raw event stream (JSON array)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn parse(&self, source: &str, listener: &mut dyn RawListener) -> Result<(), ParseFailure> {
        // Decode everything up front so a malformed recording emits nothing.
        let events: Vec<RawEvent> =
            serde_json::from_str(source).map_err(|err| ParseFailure::grammar(SYNTAX, err))?;
        check_balance(&events).map_err(|message| ParseFailure::grammar(SYNTAX, message))?;
        log::debug!("replaying {} recorded raw events", events.len());
        for event in events {
            listener.on_raw(event);
        }
        Ok(())
    }

    fn parse_inline(
        &self,
        source: &str,
        listener: &mut dyn RawListener,
    ) -> Result<(), ParseFailure> {
        SketchParser.parse_inline(source, listener)
    }
}

struct Discard;

impl Listener for Discard {
    fn on_event(&mut self, _event: Event) {}
}

/// Dry run of the normalizer's document, header and format bookkeeping.
fn check_balance(events: &[RawEvent]) -> Result<(), String> {
    let styles = StyleTable::new();
    let mut formats = FormatStack::new();
    let mut documents = 0usize;
    let mut headers: Vec<usize> = Vec::new();

    for (index, event) in events.iter().enumerate() {
        let flushes = match event {
            RawEvent::BeginFormat(format) => {
                if !format.is_empty() && !formats.can_reconcile(Some(format)) {
                    return Err(format!("event {index}: closes a format that is not open"));
                }
                formats.open(format, &styles, &mut Discard);
                continue;
            }
            RawEvent::EndFormat(format) => {
                formats.request_close(format.clone());
                continue;
            }
            RawEvent::Escape(_) => false,
            RawEvent::ExtensionBlock { name, params }
            | RawEvent::ExtensionInline { name, params } => is_id_marker(name, params),
            _ => true,
        };
        if !flushes {
            continue;
        }

        if !formats.can_reconcile(None) {
            return Err(format!("event {index}: closes a format that is not open"));
        }
        formats.flush(&styles, &mut Discard);

        match event {
            RawEvent::BeginDocument(_) => documents += 1,
            RawEvent::EndDocument(_) => {
                if documents == 0 {
                    return Err(format!("event {index}: end_document without begin_document"));
                }
                documents -= 1;
                if documents == 0 {
                    formats.close_above(0, &styles, &mut Discard);
                }
            }
            RawEvent::BeginHeader { .. } => headers.push(formats.depth()),
            RawEvent::EndHeader { .. } => {
                let Some(depth) = headers.pop() else {
                    return Err(format!("event {index}: end_header without begin_header"));
                };
                formats.close_above(depth, &styles, &mut Discard);
            }
            _ => {}
        }
    }
    Ok(())
}

fn is_id_marker(name: &str, params: &WikiParameters) -> bool {
    name == ID_EXTENSION && params.get("name").is_some()
}

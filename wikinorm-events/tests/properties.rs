//! Property tests over generated sketch input.

use crate::common::sketch;
use once_cell::sync::Lazy;
use proptest::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use wikinorm_events::common::flat_to_nested::events_to_tree;
use wikinorm_events::ir::events::Event;

static HEADER_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^H[A-Za-z0-9]*$").unwrap());

/// One paragraph line mixing words, whitespace, punctuation and style toggles.
fn inline_line() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["a", "b", " ", "**", "//", "__", "##", ".", "!", "\\\\"]),
        0..24,
    )
    .prop_map(|parts| format!("x {}", parts.concat()))
}

fn header_title() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["Intro", "Intro!", "A b", "x", "Notes 2", "?"])
}

proptest! {
    #[test]
    fn formats_are_properly_nested(line in inline_line()) {
        let events = sketch(&line);
        let mut open = Vec::new();
        for event in &events {
            match event {
                Event::StartFormat { format, parameters } => open.push((*format, parameters.clone())),
                Event::EndFormat { format, parameters } => {
                    prop_assert_eq!(open.pop(), Some((*format, parameters.clone())));
                }
                _ => {}
            }
        }
        prop_assert!(open.is_empty());
    }

    #[test]
    fn no_format_is_closed_and_reopened_immediately(line in inline_line()) {
        let events = sketch(&line);
        for pair in events.windows(2) {
            if let (
                Event::EndFormat { format: closed, parameters: p1 },
                Event::StartFormat { format: opened, parameters: p2 },
            ) = (&pair[0], &pair[1])
            {
                prop_assert!(closed != opened || p1 != p2, "{} then {}", pair[0], pair[1]);
            }
        }
    }

    #[test]
    fn documents_end_at_depth_zero(lines in prop::collection::vec(inline_line(), 1..5)) {
        let events = sketch(&lines.join("\n"));
        prop_assert!(matches!(events.first(), Some(Event::StartDocument(_))));
        prop_assert!(matches!(events.last(), Some(Event::EndDocument(_))));
        let documents = events
            .iter()
            .filter(|event| matches!(event, Event::StartDocument(_) | Event::EndDocument(_)))
            .count();
        prop_assert_eq!(documents, 2);
        prop_assert!(events_to_tree(&events).is_ok());
    }

    #[test]
    fn header_ids_are_unique(titles in prop::collection::vec(header_title(), 1..8)) {
        let source = titles
            .iter()
            .map(|title| format!("= {title} ="))
            .collect::<Vec<_>>()
            .join("\n");
        let ids: Vec<String> = sketch(&source)
            .into_iter()
            .filter_map(|event| match event {
                Event::StartHeader { id, .. } => Some(id),
                _ => None,
            })
            .collect();
        prop_assert_eq!(ids.len(), titles.len());
        let unique: HashSet<&String> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());
        for id in &ids {
            prop_assert!(HEADER_ID.is_match(id), "bad id {}", id);
        }
    }
}

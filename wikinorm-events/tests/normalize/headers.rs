//! Header buffering and id generation.

use crate::common::{body, sketch};
use insta::assert_snapshot;
use wikinorm_events::ir::events::Event;

fn header_ids(source: &str) -> Vec<String> {
    sketch(source)
        .into_iter()
        .filter_map(|event| match event {
            Event::StartHeader { id, .. } => Some(id),
            _ => None,
        })
        .collect()
}

#[test]
fn test_duplicate_titles_get_suffixes() {
    assert_eq!(
        header_ids("= Notes =\n== Notes ==\n= Notes =\n= Other notes! ="),
        vec!["HNotes", "HNotes0", "HNotes1", "HOthernotes"]
    );
}

#[test]
fn test_header_content_is_replayed_after_start() {
    assert_snapshot!(body("= The **big** one ="), @r###"
    StartSection
    StartHeader(1, HThebigone)
    Word(The)
    Space
    StartFormat(bold)
    Word(big)
    EndFormat(bold)
    Space
    Word(one)
    EndHeader(1, HThebigone)
    EndSection
    "###);
}

#[test]
fn test_link_labels_count_towards_the_id() {
    assert_eq!(header_ids("= See [[docs>>Main.Docs]] ="), vec!["HSeedocs"]);
}

#[test]
fn test_ids_do_not_depend_on_later_content() {
    let short = header_ids("= Setup =\ntext");
    let long = header_ids("= Setup =\ntext\n= Setup =\nmore");
    assert_eq!(short[0], long[0]);
    assert_eq!(long[1], "HSetup0");
}

#[test]
fn test_sections_nest_by_level() {
    let events = sketch("= A =\n== B ==\n=== C ===\n= D =");
    let depths: Vec<usize> = events
        .iter()
        .scan(0usize, |depth, event| {
            match event {
                Event::StartSection(_) => *depth += 1,
                Event::EndSection(_) => *depth -= 1,
                _ => {}
            }
            Some(*depth)
        })
        .collect();
    assert_eq!(depths.iter().max(), Some(&3));
    assert_eq!(depths.last(), Some(&0));
}

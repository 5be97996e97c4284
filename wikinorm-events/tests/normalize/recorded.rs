//! Recorded raw streams replayed through the normalizer.

use crate::common::replay;
use insta::assert_snapshot;
use wikinorm_events::ir::events::listing;
use wikinorm_events::{NormalizeError, ParseFailure};

#[test]
fn test_format_left_open_in_header_closes_inside_it() {
    let (events, result) = replay(
        r#"[
            {"begin_document": []},
            {"begin_section": {"doc_level": 1, "header_level": 1}},
            {"begin_header": {"level": 1}},
            {"begin_format": {"styles": ["em"]}},
            {"word": "Open"},
            {"end_header": {"level": 1}},
            {"end_section": {"doc_level": 1, "header_level": 1}},
            {"end_document": []}
        ]"#,
    );
    result.unwrap();
    assert_snapshot!(listing(&events), @r###"
    StartDocument [syntax="events/json"]
    StartSection
    StartHeader(1, HOpen)
    StartFormat(italic)
    Word(Open)
    EndFormat(italic)
    EndHeader(1, HOpen)
    EndSection
    EndDocument [syntax="events/json"]
    "###);
}

#[test]
fn test_nested_documents_become_groups() {
    let (events, result) = replay(
        r#"[
            {"begin_document": [["lang", "en"]]},
            {"begin_document": [["class", "inner"]]},
            {"word": "x"},
            {"end_document": [["class", "inner"]]},
            {"end_document": [["lang", "en"]]}
        ]"#,
    );
    result.unwrap();
    assert_snapshot!(listing(&events), @r###"
    StartDocument [lang="en" syntax="events/json"]
    StartGroup [class="inner"]
    Word(x)
    EndGroup [class="inner"]
    EndDocument [lang="en" syntax="events/json"]
    "###);
}

#[test]
fn test_vacuous_formats_are_ignored() {
    let (events, result) = replay(
        r#"[
            {"begin_document": []},
            {"begin_format": {}},
            {"word": "plain"},
            {"end_format": {}},
            {"escape": "*"},
            {"end_document": []}
        ]"#,
    );
    result.unwrap();
    assert_eq!(events.len(), 3);
}

#[test]
fn test_unterminated_stream_reports_depth() {
    let (events, result) = replay(r#"[{"begin_document": []}, {"word": "x"}]"#);
    assert_eq!(events.len(), 2);
    assert!(matches!(
        result,
        Err(NormalizeError::Parse(ParseFailure::Unterminated { depth: 1 }))
    ));
}

#[test]
fn test_free_standing_image() {
    let (events, result) = replay(
        r#"[
            {"begin_document": []},
            {"free_standing_image": "http://example.com/a.png"},
            {"end_document": []}
        ]"#,
    );
    result.unwrap();
    assert_eq!(
        events[1].to_string(),
        "StartImage(url:http://example.com/a.png, free)"
    );
}

#[test]
fn test_unknown_extensions_are_dropped() {
    let (events, result) = replay(
        r#"[
            {"begin_document": []},
            {"extension_block": {"name": "toc"}},
            {"extension_inline": {"name": "id", "params": [["name", "top"]]}},
            {"end_document": []}
        ]"#,
    );
    result.unwrap();
    assert_eq!(events[1].to_string(), "Id(top)");
    assert_eq!(events.len(), 3);
}

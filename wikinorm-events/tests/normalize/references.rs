//! Links, images and their labels.

use crate::common::body;
use insta::assert_snapshot;
use wikinorm_events::ir::raw::{RawEvent, WikiParameters, WikiReference};
use wikinorm_events::syntaxes::SketchParser;
use wikinorm_events::{
    Collaborators, Event, EventNormalizer, LinkResolver, NormalizerOptions, ParseFailure,
    RawListener, SourceEventParser,
};

#[test]
fn test_link_without_label() {
    assert_snapshot!(body("[[Main.Home]]"), @r###"
    StartParagraph
    StartLink(doc:Main.Home)
    EndLink(doc:Main.Home)
    EndParagraph
    "###);
}

#[test]
fn test_label_is_parsed_inline() {
    assert_snapshot!(body("[[the //docs//>>Main.Docs#Usage]]"), @r###"
    StartParagraph
    StartLink(doc:Main.Docs {anchor="Usage"})
    Word(the)
    Space
    StartFormat(italic)
    Word(docs)
    EndFormat(italic)
    EndLink(doc:Main.Docs {anchor="Usage"})
    EndParagraph
    "###);
}

#[test]
fn test_label_that_looks_like_a_list() {
    assert_snapshot!(body("[[* star>>Main.Home]]"), @r###"
    StartParagraph
    StartLink(doc:Main.Home)
    SpecialSymbol(*)
    Space
    Word(star)
    EndLink(doc:Main.Home)
    EndParagraph
    "###);
}

#[test]
fn test_broken_label_keeps_the_link() {
    assert_snapshot!(body("[[a [[b>>Main.Home]]"), @r###"
    StartParagraph
    StartLink(doc:Main.Home)
    EndLink(doc:Main.Home)
    EndParagraph
    "###);
}

#[test]
fn test_free_standing_url() {
    assert_snapshot!(body("see http://example.com"), @r###"
    StartParagraph
    Word(see)
    Space
    StartLink(url:http://example.com, free)
    EndLink(url:http://example.com, free)
    EndParagraph
    "###);
}

#[test]
fn test_image_with_parameters() {
    assert_snapshot!(body("[[image:logo.png||alt=\"Logo\"]]"), @r###"
    StartParagraph
    StartImage(attach:logo.png) [alt="Logo"]
    EndImage(attach:logo.png) [alt="Logo"]
    EndParagraph
    "###);
}

#[test]
fn test_link_inside_format() {
    assert_snapshot!(body("**[[x>>Y]]**"), @r###"
    StartParagraph
    StartFormat(bold)
    StartLink(doc:Y)
    Word(x)
    EndLink(doc:Y)
    EndFormat(bold)
    EndParagraph
    "###);
}

#[test]
fn test_mailto_link() {
    assert_snapshot!(body("mailto:ann@example.com"), @r###"
    StartParagraph
    StartLink(mailto:ann@example.com, free)
    EndLink(mailto:ann@example.com, free)
    EndParagraph
    "###);
}

/// A grammar without an inline entry point: labels are parsed as whole documents.
struct DocumentsOnly;

impl SourceEventParser for DocumentsOnly {
    fn syntax(&self) -> &str {
        "documents-only/1.0"
    }

    fn parse(&self, source: &str, listener: &mut dyn RawListener) -> Result<(), ParseFailure> {
        SketchParser.parse(source, listener)
    }
}

#[test]
fn test_header_inside_label_does_not_duplicate_ids() {
    let resolver = LinkResolver;
    let mut events: Vec<Event> = Vec::new();
    {
        let collaborators = Collaborators::new(&DocumentsOnly).with_link_resolver(&resolver);
        let mut normalizer =
            EventNormalizer::new(collaborators, NormalizerOptions::default(), &mut events);
        for raw in [
            RawEvent::BeginDocument(WikiParameters::new()),
            RawEvent::BeginSection {
                doc_level: 1,
                header_level: 1,
                params: WikiParameters::new(),
            },
            RawEvent::BeginHeader {
                level: 1,
                params: WikiParameters::new(),
            },
            RawEvent::Word("Intro".into()),
            RawEvent::EndHeader {
                level: 1,
                params: WikiParameters::new(),
            },
            RawEvent::BeginParagraph(WikiParameters::new()),
            RawEvent::Reference(WikiReference::new("Main.Home").with_label("x\n= Intro =")),
            RawEvent::EndParagraph(WikiParameters::new()),
            RawEvent::EndSection {
                doc_level: 1,
                header_level: 1,
                params: WikiParameters::new(),
            },
            RawEvent::EndDocument(WikiParameters::new()),
        ] {
            normalizer.on_raw(raw);
        }
        normalizer.finish().unwrap();
    }

    let ids: Vec<&str> = events
        .iter()
        .filter_map(|event| match event {
            Event::StartHeader { id, .. } => Some(id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(ids, vec!["HIntro"]);

    let start = events
        .iter()
        .position(|event| matches!(event, Event::StartLink { .. }))
        .unwrap();
    let end = events
        .iter()
        .position(|event| matches!(event, Event::EndLink { .. }))
        .unwrap();
    let label = &events[start + 1..end];
    assert!(label.contains(&Event::Word("x".into())));
    assert!(label.contains(&Event::Word("Intro".into())));
    assert!(!label.iter().any(|event| matches!(
        event,
        Event::StartSection(_) | Event::StartHeader { .. } | Event::EndHeader { .. }
    )));
}


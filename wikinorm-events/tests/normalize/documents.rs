//! Block structure of whole documents.

use crate::common::{body, sketch};
use insta::assert_snapshot;
use wikinorm_events::ir::events::{listing, Event};

#[test]
fn test_sections_paragraphs_and_lists() {
    let source = "= Intro =\nSome **bold** text.\n* one\n* two";
    assert_snapshot!(listing(&sketch(source)), @r###"
    StartDocument [syntax="sketch/1.0"]
    StartSection
    StartHeader(1, HIntro)
    Word(Intro)
    EndHeader(1, HIntro)
    StartParagraph
    Word(Some)
    Space
    StartFormat(bold)
    Word(bold)
    EndFormat(bold)
    Space
    Word(text)
    SpecialSymbol(.)
    EndParagraph
    StartList(bulleted)
    StartListItem
    Word(one)
    EndListItem
    StartListItem
    Word(two)
    EndListItem
    EndList(bulleted)
    EndSection
    EndDocument [syntax="sketch/1.0"]
    "###);
}

#[test]
fn test_table_with_head_cells() {
    assert_snapshot!(body("|=Name|=Age\n|Ann|42"), @r###"
    StartTable
    StartTableRow
    StartTableHeadCell
    Word(Name)
    EndTableHeadCell
    StartTableHeadCell
    Word(Age)
    EndTableHeadCell
    EndTableRow
    StartTableRow
    StartTableCell
    Word(Ann)
    EndTableCell
    StartTableCell
    Word(42)
    EndTableCell
    EndTableRow
    EndTable
    "###);
}

#[test]
fn test_definitions_and_nested_quotations() {
    assert_snapshot!(body("; term\n: meaning\n> quoted\n>> deeper"), @r###"
    StartDefinitionList
    StartDefinitionTerm
    Word(term)
    EndDefinitionTerm
    StartDefinitionDescription
    Word(meaning)
    EndDefinitionDescription
    EndDefinitionList
    StartQuotation
    StartQuotationLine
    Word(quoted)
    EndQuotationLine
    StartQuotation
    StartQuotationLine
    Word(deeper)
    EndQuotationLine
    EndQuotation
    EndQuotation
    "###);
}

#[test]
fn test_leaves() {
    let source = "{{toc/}}\n----\nfirst\\\\second\nthird {{{**raw**}}}\n{{id name=\"here\"/}}";
    assert_snapshot!(body(source), @r###"
    Macro(toc)
    HorizontalLine
    StartParagraph
    Word(first)
    NewLine
    Word(second)
    NewLine
    Word(third)
    Space
    Verbatim("**raw**", inline)
    EndParagraph
    Id(here)
    "###);
}

#[test]
fn test_extra_blank_lines_between_paragraphs() {
    assert_snapshot!(body("a\n\n\n\nb"), @r###"
    StartParagraph
    Word(a)
    EndParagraph
    EmptyLines(2)
    StartParagraph
    Word(b)
    EndParagraph
    "###);
}

#[test]
fn test_block_parameters() {
    assert_snapshot!(body("(% class=\"lead\" %)\ntext"), @r###"
    StartParagraph [class="lead"]
    Word(text)
    EndParagraph [class="lead"]
    "###);
}

#[test]
fn test_empty_source_is_an_empty_document() {
    let events = sketch("");
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], Event::StartDocument(meta) if meta.get("syntax") == Some("sketch/1.0")));
}

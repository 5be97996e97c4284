//! Lazy format closing as seen through whole documents.

use crate::common::body;
use insta::assert_snapshot;

#[test]
fn test_adjacent_runs_merge() {
    assert_snapshot!(body("**a b**"), @r###"
    StartParagraph
    StartFormat(bold)
    Word(a)
    Space
    Word(b)
    EndFormat(bold)
    EndParagraph
    "###);
}

#[test]
fn test_nested_styles_close_together() {
    assert_snapshot!(body("**bold //both//** plain"), @r###"
    StartParagraph
    StartFormat(bold)
    Word(bold)
    Space
    StartFormat(italic)
    Word(both)
    EndFormat(italic)
    EndFormat(bold)
    Space
    Word(plain)
    EndParagraph
    "###);
}

#[test]
fn test_partial_close_keeps_outer_scope() {
    assert_snapshot!(body("**a //b// c**"), @r###"
    StartParagraph
    StartFormat(bold)
    Word(a)
    Space
    StartFormat(italic)
    Word(b)
    EndFormat(italic)
    Space
    Word(c)
    EndFormat(bold)
    EndParagraph
    "###);
}

#[test]
fn test_closing_outer_scope_reopens_inner() {
    assert_snapshot!(body("//a **b// c**"), @r###"
    StartParagraph
    StartFormat(italic)
    Word(a)
    Space
    StartFormat(bold)
    Word(b)
    EndFormat(bold)
    EndFormat(italic)
    StartFormat(bold)
    Space
    Word(c)
    EndFormat(bold)
    EndParagraph
    "###);
}

#[test]
fn test_parameter_only_format() {
    assert_snapshot!(body("(% class=\"hl\" %)x(%%) y"), @r###"
    StartParagraph
    StartFormat(none) [class="hl"]
    Word(x)
    EndFormat(none) [class="hl"]
    Space
    Word(y)
    EndParagraph
    "###);
}

#[test]
fn test_runs_split_per_character() {
    assert_snapshot!(body("a?!  b"), @r###"
    StartParagraph
    Word(a)
    SpecialSymbol(?)
    SpecialSymbol(!)
    Space
    Space
    Word(b)
    EndParagraph
    "###);
}

#[test]
fn test_all_inline_styles() {
    let listing = body("__u__ --s-- ##m## ^^p^^ ,,b,,");
    for format in ["underline", "strikeout", "monospace", "superscript", "subscript"] {
        assert!(listing.contains(&format!("StartFormat({format})")), "{format} missing");
        assert!(listing.contains(&format!("EndFormat({format})")), "{format} missing");
    }
}

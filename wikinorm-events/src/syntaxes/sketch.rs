//! The `sketch/1.0` syntax: a small, line-based wiki dialect.
//!
//! Sketch exists to drive the normalizer end to end. It is not meant for writing
//! documents, but it produces every raw event kind the way real wiki grammars do,
//! including a format-open/format-close pair around every styled inline run.
//!
//! Blocks, one per line (consecutive text lines form one paragraph):
//!
//! ```text
//! = Header =  == Level two ==      headers, each opening a section
//! * bullet    ** nested   1. numbered
//! > quote     >> nested quote
//! |= head | cell                    table row
//! ; term      : description
//! ----                              horizontal line
//! {{{ ... }}}                       verbatim block (on its own lines)
//! {{name k="v"/}}                   block macro; {{id name="x"/}} is an anchor
//! (% class="lead" %)                parameters for the next block
//! ```
//!
//! Inline: `**bold**`, `//italic//`, `__underline__`, `##mono##`, `\\` line break,
//! `~x` escape, `[[label>>target||k="v"]]`, `[[image:photo.png]]`, bare URLs,
//! `{{{verbatim}}}`, `{{macro/}}`, and `(% k="v" %)...(%%)` for parameter-only
//! formatting. Macros never carry content.

use crate::error::{ParseFailure, SyntaxError};
use crate::ir::raw::{
    RawEvent, WikiFormat, WikiParameter, WikiParameters, WikiReference, WikiStyle,
};
use crate::parser::{RawListener, SourceEventParser};
use logos::{Lexer, Logos};

pub const SYNTAX: &str = "sketch/1.0";

/// Name of the macro that declares an explicit anchor.
const ID_MACRO: &str = "id";

/// Inline tokens. Everything that is not whitespace or ASCII punctuation is a word.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    #[token("**")]
    Bold,
    #[token("//")]
    Italic,
    #[token("__")]
    Underline,
    #[token("##")]
    Mono,
    #[token("\\\\")]
    LineBreak,
    #[regex(r"~.")]
    Escape,
    #[token("[[")]
    LinkOpen,
    #[token("{{{")]
    VerbatimOpen,
    #[token("{{")]
    MacroOpen,
    #[regex(r"\(%[^%]*%\)")]
    Parameters,
    #[regex(r"[a-zA-Z][a-zA-Z0-9+.\-]*://[^\s\[\]|]+", priority = 5)]
    Url,
    #[regex(r"mailto:[^\s\[\]|]+", priority = 6)]
    Mailto,
    #[regex(r"[ \t]+")]
    Space,
    #[regex(r"\r?\n")]
    Newline,
    #[regex(r"[^\s!-/:-@\[-`{-~]+")]
    Word,
    #[regex(r"[!-/:-@\[-`{-~]")]
    Symbol,
}

/// Parser for the `sketch/1.0` syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct SketchParser;

impl SourceEventParser for SketchParser {
    fn syntax(&self) -> &str {
        SYNTAX
    }

    fn description(&self) -> &str {
        "Small line-based wiki dialect for demos and tests"
    }

    fn file_extensions(&self) -> &[&str] {
        &["sketch", "wiki"]
    }

    fn parse(&self, source: &str, listener: &mut dyn RawListener) -> Result<(), ParseFailure> {
        BlockParser::new(listener)
            .run(source)
            .map_err(|err| ParseFailure::grammar(SYNTAX, err))
    }

    /// Inline text is wrapped in a document and a paragraph, like a one-paragraph
    /// document whose lines are never taken for blocks.
    fn parse_inline(
        &self,
        source: &str,
        listener: &mut dyn RawListener,
    ) -> Result<(), ParseFailure> {
        listener.on_raw(RawEvent::BeginDocument(WikiParameters::new()));
        listener.on_raw(RawEvent::BeginParagraph(WikiParameters::new()));
        InlineParser::new(&mut *listener, 1)
            .run(source)
            .map_err(|err| ParseFailure::grammar(SYNTAX, err))?;
        listener.on_raw(RawEvent::EndParagraph(WikiParameters::new()));
        listener.on_raw(RawEvent::EndDocument(WikiParameters::new()));
        Ok(())
    }
}

/// Parses `key="value" other=value flag` into parameters, in declaration order.
pub fn parse_parameters(text: &str) -> WikiParameters {
    let mut params = WikiParameters::new();
    let mut rest = text.trim_start();
    while !rest.is_empty() {
        let key_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        rest = rest[key_end..].trim_start();

        let mut value = "";
        if let Some(after) = rest.strip_prefix('=') {
            let after = after.trim_start();
            if let Some(quoted) = after.strip_prefix('"') {
                let end = quoted.find('"').unwrap_or(quoted.len());
                value = &quoted[..end];
                rest = quoted.get(end + 1..).unwrap_or("");
            } else {
                let end = after.find(char::is_whitespace).unwrap_or(after.len());
                value = &after[..end];
                rest = &after[end..];
            }
        }

        if !key.is_empty() {
            params.0.push(WikiParameter::new(key, value));
        }
        rest = rest.trim_start();
    }
    params
}

/// `name k="v"/` or `name k="v"`, the part between `{{` and `}}`.
struct MacroCall {
    name: String,
    params: WikiParameters,
}

impl MacroCall {
    fn parse(header: &str, line: usize) -> Result<Self, SyntaxError> {
        let body = header.trim().trim_end_matches('/').trim();
        let (name, params) = match body.split_once(char::is_whitespace) {
            Some((name, params)) => (name, parse_parameters(params)),
            None => (body, WikiParameters::new()),
        };
        if name.is_empty() {
            return Err(SyntaxError::new(line, "macro without a name"));
        }
        Ok(Self {
            name: name.to_string(),
            params,
        })
    }

    fn into_event(self, inline: bool) -> RawEvent {
        let MacroCall { name, params } = self;
        match (name == ID_MACRO, inline) {
            (true, true) => RawEvent::ExtensionInline { name, params },
            (true, false) => RawEvent::ExtensionBlock { name, params },
            (false, true) => RawEvent::MacroInline {
                name,
                params,
                content: None,
            },
            (false, false) => RawEvent::MacroBlock {
                name,
                params,
                content: None,
            },
        }
    }
}

fn reference(inner: &str) -> RawEvent {
    let (main, params) = match inner.split_once("||") {
        Some((main, params)) => (main, parse_parameters(params)),
        None => (inner, WikiParameters::new()),
    };
    let (label, target) = match main.rsplit_once(">>") {
        Some((label, target)) => (Some(label), target.trim()),
        None => (None, main.trim()),
    };
    let build = |link: &str| {
        let reference = WikiReference::new(link).with_params(params);
        match label {
            Some(label) => reference.with_label(label),
            None => reference,
        }
    };
    match target.strip_prefix("image:") {
        Some(source) => RawEvent::Image(build(source)),
        None => RawEvent::Reference(build(target)),
    }
}

/// Consumes input up to and including `terminator`, returning what came before it.
fn take_until<'s>(lexer: &mut Lexer<'s, Token>, terminator: &str) -> Option<&'s str> {
    let rest = lexer.remainder();
    let end = rest.find(terminator)?;
    lexer.bump(end + terminator.len());
    Some(&rest[..end])
}

struct InlineParser<'o> {
    out: &'o mut dyn RawListener,
    line: usize,
    styles: Vec<WikiStyle>,
    params: Vec<WikiParameter>,
    symbols: String,
}

impl<'o> InlineParser<'o> {
    fn new(out: &'o mut dyn RawListener, line: usize) -> Self {
        Self {
            out,
            line,
            styles: Vec::new(),
            params: Vec::new(),
            symbols: String::new(),
        }
    }

    fn run(mut self, text: &str) -> Result<(), SyntaxError> {
        let mut lexer = Token::lexer(text);
        while let Some(token) = lexer.next() {
            let slice = lexer.slice();
            // Exotic whitespace is the only thing no rule covers.
            let token = token.unwrap_or(Token::Space);
            if token != Token::Symbol {
                self.flush_symbols();
            }

            match token {
                Token::Bold => self.toggle(WikiStyle::Strong),
                Token::Italic => self.toggle(WikiStyle::Em),
                Token::Underline => self.toggle(WikiStyle::Ins),
                Token::Mono => self.toggle(WikiStyle::Mono),
                Token::LineBreak => self.out.on_raw(RawEvent::LineBreak),
                Token::Newline => {
                    self.line += 1;
                    self.out.on_raw(RawEvent::NewLine);
                }
                Token::Escape => {
                    let escaped: String = slice.chars().skip(1).collect();
                    self.out.on_raw(RawEvent::Escape(escaped.clone()));
                    if escaped.chars().all(char::is_alphanumeric) {
                        self.content(RawEvent::Word(escaped));
                    } else {
                        self.content(RawEvent::SpecialSymbol(escaped));
                    }
                }
                Token::Parameters => {
                    let inner = slice[2..slice.len() - 2].trim();
                    self.params = parse_parameters(inner).0;
                }
                Token::Url | Token::Mailto => {
                    self.content(RawEvent::FreeStandingReference(slice.to_string()))
                }
                Token::Space => self.content(RawEvent::Space(slice.to_string())),
                Token::Word => self.content(RawEvent::Word(slice.to_string())),
                Token::Symbol => self.symbols.push_str(slice),
                Token::LinkOpen => {
                    let inner = take_until(&mut lexer, "]]").ok_or_else(|| {
                        SyntaxError::new(self.line, "unterminated link, missing ']]'")
                    })?;
                    self.content(reference(inner));
                }
                Token::VerbatimOpen => {
                    let inner = take_until(&mut lexer, "}}}").ok_or_else(|| {
                        SyntaxError::new(self.line, "unterminated verbatim, missing '}}}'")
                    })?;
                    self.content(RawEvent::VerbatimInline {
                        content: inner.to_string(),
                        params: WikiParameters::new(),
                    });
                }
                Token::MacroOpen => {
                    let header = take_until(&mut lexer, "}}").ok_or_else(|| {
                        SyntaxError::new(self.line, "unterminated macro, missing '}}'")
                    })?;
                    let call = MacroCall::parse(header, self.line)?;
                    self.content(call.into_event(true));
                }
            }
        }
        self.flush_symbols();
        Ok(())
    }

    fn toggle(&mut self, style: WikiStyle) {
        match self.styles.iter().position(|open| *open == style) {
            Some(index) => {
                self.styles.remove(index);
            }
            None => self.styles.push(style),
        }
    }

    /// Emits `event`, wrapped in the current format when there is one.
    fn content(&mut self, event: RawEvent) {
        if self.styles.is_empty() && self.params.is_empty() {
            self.out.on_raw(event);
            return;
        }
        let format = WikiFormat {
            styles: self.styles.clone(),
            params: self.params.clone(),
        };
        self.out.on_raw(RawEvent::BeginFormat(format.clone()));
        self.out.on_raw(event);
        self.out.on_raw(RawEvent::EndFormat(format));
    }

    fn flush_symbols(&mut self) {
        if !self.symbols.is_empty() {
            let run = std::mem::take(&mut self.symbols);
            self.content(RawEvent::SpecialSymbol(run));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Paragraph,
    Table,
    DefinitionList,
    List,
    Quotation,
}

#[derive(Debug)]
struct ListFrame {
    ordered: bool,
    item_open: bool,
    params: WikiParameters,
}

struct BlockParser<'o> {
    out: &'o mut dyn RawListener,
    open: Option<(Block, WikiParameters)>,
    lists: Vec<ListFrame>,
    quotes: Vec<WikiParameters>,
    sections: Vec<usize>,
    pending_params: WikiParameters,
    blank_lines: usize,
}

impl<'o> BlockParser<'o> {
    fn new(out: &'o mut dyn RawListener) -> Self {
        Self {
            out,
            open: None,
            lists: Vec::new(),
            quotes: Vec::new(),
            sections: Vec::new(),
            pending_params: WikiParameters::new(),
            blank_lines: 0,
        }
    }

    fn emit(&mut self, event: RawEvent) {
        self.out.on_raw(event);
    }

    fn run(mut self, source: &str) -> Result<(), SyntaxError> {
        self.emit(RawEvent::BeginDocument(WikiParameters::new()));

        let lines: Vec<&str> = source.lines().collect();
        let mut index = 0;
        while index < lines.len() {
            let number = index + 1;
            let trimmed = lines[index].trim();
            index += 1;

            if trimmed.is_empty() {
                self.close_block();
                self.blank_lines += 1;
                continue;
            }
            if let Some(params) = block_parameters(trimmed) {
                self.close_block();
                self.pending_params = params;
                continue;
            }
            self.flush_blank_lines();

            if trimmed == "{{{" {
                let (content, next) = collect_until(&lines, index, "}}}").ok_or_else(|| {
                    SyntaxError::new(number, "unterminated verbatim block, missing '}}}'")
                })?;
                index = next;
                self.close_block();
                let params = self.take_params();
                self.emit(RawEvent::VerbatimBlock { content, params });
                continue;
            }

            if self.block_macro(trimmed, number)? {
                continue;
            }

            if trimmed.starts_with('=') {
                self.header(trimmed, number)?;
            } else if trimmed.len() >= 4 && trimmed.chars().all(|c| c == '-') {
                self.close_block();
                let params = self.take_params();
                self.emit(RawEvent::HorizontalLine(params));
            } else if let Some((depth, ordered, text)) = list_item(trimmed) {
                self.list_item(depth, ordered, text, number)?;
            } else if trimmed.starts_with('>') {
                self.quotation_line(trimmed, number)?;
            } else if let Some(row) = trimmed.strip_prefix('|') {
                self.table_row(row, number)?;
            } else if let Some(term) = trimmed.strip_prefix(';') {
                self.definition(true, term.trim(), number)?;
            } else if let Some(description) = trimmed.strip_prefix(':') {
                self.definition(false, description.trim(), number)?;
            } else {
                self.text(trimmed, number)?;
            }
        }

        self.close_block();
        while let Some(level) = self.sections.pop() {
            self.emit(RawEvent::EndSection {
                doc_level: 1,
                header_level: level,
                params: WikiParameters::new(),
            });
        }
        self.emit(RawEvent::EndDocument(WikiParameters::new()));
        Ok(())
    }

    fn inline(&mut self, text: &str, line: usize) -> Result<(), SyntaxError> {
        InlineParser::new(&mut *self.out, line).run(text)
    }

    fn take_params(&mut self) -> WikiParameters {
        std::mem::take(&mut self.pending_params)
    }

    fn flush_blank_lines(&mut self) {
        if self.blank_lines > 1 {
            self.emit(RawEvent::EmptyLines(self.blank_lines - 1));
        }
        self.blank_lines = 0;
    }

    /// Opens `kind` unless it is the block already open.
    fn enter(&mut self, kind: Block) -> bool {
        if matches!(self.open, Some((open, _)) if open == kind) {
            return false;
        }
        self.close_block();
        let params = match kind {
            // Lists and quotations keep their parameters on the outermost level.
            Block::List | Block::Quotation => WikiParameters::new(),
            _ => self.take_params(),
        };
        self.open = Some((kind, params.clone()));
        match kind {
            Block::Paragraph => self.emit(RawEvent::BeginParagraph(params)),
            Block::Table => self.emit(RawEvent::BeginTable(params)),
            Block::DefinitionList => self.emit(RawEvent::BeginDefinitionList(params)),
            Block::List | Block::Quotation => {}
        }
        true
    }

    fn close_block(&mut self) {
        match self.open.take() {
            Some((Block::Paragraph, params)) => self.emit(RawEvent::EndParagraph(params)),
            Some((Block::Table, params)) => self.emit(RawEvent::EndTable(params)),
            Some((Block::DefinitionList, params)) => {
                self.emit(RawEvent::EndDefinitionList(params))
            }
            Some((Block::List, _)) => self.close_lists(0),
            Some((Block::Quotation, _)) => self.close_quotes(0),
            None => {}
        }
    }

    /// A line holding nothing but `{{name .../}}`.
    fn block_macro(&mut self, trimmed: &str, number: usize) -> Result<bool, SyntaxError> {
        let Some(header) = trimmed
            .strip_prefix("{{")
            .filter(|rest| !rest.starts_with('{'))
            .and_then(|rest| rest.strip_suffix("}}"))
        else {
            return Ok(false);
        };
        if header.contains("}}") {
            return Ok(false);
        }
        let call = MacroCall::parse(header, number)?;
        self.close_block();
        self.emit(call.into_event(false));
        Ok(true)
    }

    fn header(&mut self, trimmed: &str, number: usize) -> Result<(), SyntaxError> {
        let level = trimmed.chars().take_while(|c| *c == '=').count();
        let text = trimmed[level..].trim_end_matches('=').trim();

        self.close_block();
        while let Some(&open) = self.sections.last() {
            if open < level {
                break;
            }
            self.sections.pop();
            self.emit(RawEvent::EndSection {
                doc_level: 1,
                header_level: open,
                params: WikiParameters::new(),
            });
        }
        self.sections.push(level);
        self.emit(RawEvent::BeginSection {
            doc_level: 1,
            header_level: level,
            params: WikiParameters::new(),
        });

        let params = self.take_params();
        self.emit(RawEvent::BeginHeader {
            level,
            params: params.clone(),
        });
        self.inline(text, number)?;
        self.emit(RawEvent::EndHeader { level, params });
        Ok(())
    }

    fn list_item(
        &mut self,
        depth: usize,
        ordered: bool,
        text: &str,
        number: usize,
    ) -> Result<(), SyntaxError> {
        self.enter(Block::List);
        self.close_lists(depth);

        if self.lists.len() == depth {
            let same_kind = self.lists.last().is_some_and(|top| top.ordered == ordered);
            if !same_kind {
                self.close_lists(depth - 1);
            } else if let Some(top) = self.lists.last_mut().filter(|top| top.item_open) {
                top.item_open = false;
                self.emit(RawEvent::EndListItem);
            }
        }

        while self.lists.len() < depth {
            if let Some(parent) = self.lists.last_mut() {
                if !parent.item_open {
                    parent.item_open = true;
                    self.emit(RawEvent::BeginListItem);
                }
            }
            let params = if self.lists.is_empty() {
                self.take_params()
            } else {
                WikiParameters::new()
            };
            self.emit(RawEvent::BeginList {
                ordered,
                params: params.clone(),
            });
            self.lists.push(ListFrame {
                ordered,
                item_open: false,
                params,
            });
        }

        if let Some(top) = self.lists.last_mut() {
            top.item_open = true;
        }
        self.emit(RawEvent::BeginListItem);
        self.inline(text, number)
    }

    fn close_lists(&mut self, depth: usize) {
        while self.lists.len() > depth {
            let Some(frame) = self.lists.pop() else {
                break;
            };
            if frame.item_open {
                self.emit(RawEvent::EndListItem);
            }
            self.emit(RawEvent::EndList {
                ordered: frame.ordered,
                params: frame.params,
            });
        }
    }

    fn quotation_line(&mut self, trimmed: &str, number: usize) -> Result<(), SyntaxError> {
        let depth = trimmed.chars().take_while(|c| *c == '>').count();
        let text = trimmed[depth..].trim_start();

        self.enter(Block::Quotation);
        self.close_quotes(depth);
        while self.quotes.len() < depth {
            let params = if self.quotes.is_empty() {
                self.take_params()
            } else {
                WikiParameters::new()
            };
            self.emit(RawEvent::BeginQuotation(params.clone()));
            self.quotes.push(params);
        }

        self.emit(RawEvent::BeginQuotationLine);
        self.inline(text, number)?;
        self.emit(RawEvent::EndQuotationLine);
        Ok(())
    }

    fn close_quotes(&mut self, depth: usize) {
        while self.quotes.len() > depth {
            let Some(params) = self.quotes.pop() else {
                break;
            };
            self.emit(RawEvent::EndQuotation(params));
        }
    }

    fn table_row(&mut self, row: &str, number: usize) -> Result<(), SyntaxError> {
        self.enter(Block::Table);
        self.emit(RawEvent::BeginTableRow(WikiParameters::new()));
        for cell in split_cells(row) {
            let (head, text) = match cell.strip_prefix('=') {
                Some(text) => (true, text),
                None => (false, cell),
            };
            self.emit(RawEvent::BeginTableCell {
                head,
                params: WikiParameters::new(),
            });
            self.inline(text.trim(), number)?;
            self.emit(RawEvent::EndTableCell {
                head,
                params: WikiParameters::new(),
            });
        }
        self.emit(RawEvent::EndTableRow(WikiParameters::new()));
        Ok(())
    }

    fn definition(&mut self, term: bool, text: &str, number: usize) -> Result<(), SyntaxError> {
        self.enter(Block::DefinitionList);
        let (begin, end) = if term {
            (RawEvent::BeginDefinitionTerm, RawEvent::EndDefinitionTerm)
        } else {
            (
                RawEvent::BeginDefinitionDescription,
                RawEvent::EndDefinitionDescription,
            )
        };
        self.emit(begin);
        self.inline(text, number)?;
        self.emit(end);
        Ok(())
    }

    fn text(&mut self, trimmed: &str, number: usize) -> Result<(), SyntaxError> {
        if !self.enter(Block::Paragraph) {
            self.emit(RawEvent::NewLine);
        }
        self.inline(trimmed, number)
    }
}

/// `(% k="v" %)` on a line of its own.
fn block_parameters(trimmed: &str) -> Option<WikiParameters> {
    let inner = trimmed.strip_prefix("(%")?.strip_suffix("%)")?;
    if inner.contains("%)") {
        return None;
    }
    Some(parse_parameters(inner))
}

/// `** text` (bulleted, depth 2) or `11. text` (numbered, depth 2).
fn list_item(trimmed: &str) -> Option<(usize, bool, &str)> {
    let stars = trimmed.chars().take_while(|c| *c == '*').count();
    if stars > 0 {
        let text = trimmed[stars..].strip_prefix(char::is_whitespace)?;
        return Some((stars, false, text.trim_start()));
    }
    let ones = trimmed.chars().take_while(|c| *c == '1').count();
    if ones > 0 {
        let text = trimmed[ones..]
            .strip_prefix('.')?
            .strip_prefix(char::is_whitespace)?;
        return Some((ones, true, text.trim_start()));
    }
    None
}

/// Lines after `start` up to the line equal to `terminator`, and the index after it.
fn collect_until(lines: &[&str], start: usize, terminator: &str) -> Option<(String, usize)> {
    let offset = lines[start..]
        .iter()
        .position(|line| line.trim() == terminator)?;
    let content = lines[start..start + offset].join("\n");
    Some((content, start + offset + 1))
}

/// Splits a table row on `|`, ignoring bars inside `[[...]]` and `{{...}}`.
fn split_cells(row: &str) -> Vec<&str> {
    let mut cells = Vec::new();
    let bytes = row.as_bytes();
    let mut depth = 0usize;
    let mut start = 0;
    let mut index = 0;
    while index < bytes.len() {
        match (bytes[index], bytes.get(index + 1)) {
            (b'[', Some(b'[')) | (b'{', Some(b'{')) => {
                depth += 1;
                index += 2;
                continue;
            }
            (b']', Some(b']')) | (b'}', Some(b'}')) if depth > 0 => {
                depth -= 1;
                index += 2;
                continue;
            }
            (b'|', _) if depth == 0 => {
                cells.push(&row[start..index]);
                start = index + 1;
            }
            _ => {}
        }
        index += 1;
    }
    let last = &row[start..];
    if !last.trim().is_empty() {
        cells.push(last);
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<RawEvent> {
        let mut events = Vec::new();
        SketchParser.parse(source, &mut events).unwrap();
        events
    }

    fn inline(source: &str) -> Vec<RawEvent> {
        let mut events = Vec::new();
        SketchParser.parse_inline(source, &mut events).unwrap();
        events[2..events.len() - 2].to_vec()
    }

    fn strong() -> WikiFormat {
        WikiFormat::style(WikiStyle::Strong)
    }

    #[test]
    fn styled_runs_are_wrapped_one_by_one() {
        assert_eq!(
            inline("**a b**"),
            vec![
                RawEvent::BeginFormat(strong()),
                RawEvent::Word("a".into()),
                RawEvent::EndFormat(strong()),
                RawEvent::BeginFormat(strong()),
                RawEvent::Space(" ".into()),
                RawEvent::EndFormat(strong()),
                RawEvent::BeginFormat(strong()),
                RawEvent::Word("b".into()),
                RawEvent::EndFormat(strong()),
            ]
        );
    }

    #[test]
    fn punctuation_is_grouped_into_runs() {
        assert_eq!(
            inline("Hi?! x"),
            vec![
                RawEvent::Word("Hi".into()),
                RawEvent::SpecialSymbol("?!".into()),
                RawEvent::Space(" ".into()),
                RawEvent::Word("x".into()),
            ]
        );
    }

    #[test]
    fn links_carry_label_target_and_parameters() {
        assert_eq!(
            inline("[[the **home**>>Main.Home||target=\"_blank\"]]"),
            vec![RawEvent::Reference(
                WikiReference::new("Main.Home")
                    .with_label("the **home**")
                    .with_params(WikiParameters::new().with("target", "_blank"))
            )]
        );
        assert_eq!(
            inline("[[image:logo.png]]"),
            vec![RawEvent::Image(WikiReference::new("logo.png"))]
        );
    }

    #[test]
    fn bare_urls_are_free_standing() {
        assert_eq!(
            inline("see http://example.com/a?b=c"),
            vec![
                RawEvent::Word("see".into()),
                RawEvent::Space(" ".into()),
                RawEvent::FreeStandingReference("http://example.com/a?b=c".into()),
            ]
        );
    }

    #[test]
    fn escape_suppresses_markup() {
        assert_eq!(
            inline("~*~*"),
            vec![
                RawEvent::Escape("*".into()),
                RawEvent::SpecialSymbol("*".into()),
                RawEvent::Escape("*".into()),
                RawEvent::SpecialSymbol("*".into()),
            ]
        );
    }

    #[test]
    fn inline_macros_and_anchors() {
        assert_eq!(
            inline("{{id name=\"top\"/}}{{info/}}"),
            vec![
                RawEvent::ExtensionInline {
                    name: "id".into(),
                    params: WikiParameters::new().with("name", "top"),
                },
                RawEvent::MacroInline {
                    name: "info".into(),
                    params: WikiParameters::new(),
                    content: None,
                },
            ]
        );
    }

    #[test]
    fn parameter_only_format() {
        let red = WikiFormat::default().with_params(vec![WikiParameter::new("style", "color:red")]);
        assert_eq!(
            inline("(% style=\"color:red\" %)red(%%)plain"),
            vec![
                RawEvent::BeginFormat(red.clone()),
                RawEvent::Word("red".into()),
                RawEvent::EndFormat(red),
                RawEvent::Word("plain".into()),
            ]
        );
    }

    #[test]
    fn unterminated_link_is_an_error() {
        let mut events = Vec::new();
        let err = SketchParser
            .parse("text\n[[Main.Home", &mut events)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "sketch/1.0 parser failed: line 2: unterminated link, missing ']]'"
        );
    }

    #[test]
    fn headers_open_nested_sections() {
        let events = parse("= A =\n== B ==\n= C =");
        let sections: Vec<String> = events
            .iter()
            .filter_map(|event| match event {
                RawEvent::BeginSection { header_level, .. } => Some(format!("+{header_level}")),
                RawEvent::EndSection { header_level, .. } => Some(format!("-{header_level}")),
                _ => None,
            })
            .collect();
        assert_eq!(sections, vec!["+1", "+2", "-2", "-1", "+1", "-1"]);
    }

    #[test]
    fn nested_lists_open_inside_items() {
        let events = parse("* a\n** b\n* c");
        let expected = vec![
            RawEvent::BeginDocument(WikiParameters::new()),
            RawEvent::BeginList {
                ordered: false,
                params: WikiParameters::new(),
            },
            RawEvent::BeginListItem,
            RawEvent::Word("a".into()),
            RawEvent::BeginList {
                ordered: false,
                params: WikiParameters::new(),
            },
            RawEvent::BeginListItem,
            RawEvent::Word("b".into()),
            RawEvent::EndListItem,
            RawEvent::EndList {
                ordered: false,
                params: WikiParameters::new(),
            },
            RawEvent::EndListItem,
            RawEvent::BeginListItem,
            RawEvent::Word("c".into()),
            RawEvent::EndListItem,
            RawEvent::EndList {
                ordered: false,
                params: WikiParameters::new(),
            },
            RawEvent::EndDocument(WikiParameters::new()),
        ];
        assert_eq!(events, expected);
    }

    #[test]
    fn table_cells_ignore_bars_inside_links() {
        assert_eq!(split_cells("=A|[[x||y=z]]|"), vec!["=A", "[[x||y=z]]"]);
    }

    #[test]
    fn verbatim_blocks_span_lines() {
        let events = parse("{{{\nraw **text**\n}}}\n{{code lang=rust/}}");
        assert_eq!(
            events[1],
            RawEvent::VerbatimBlock {
                content: "raw **text**".into(),
                params: WikiParameters::new(),
            }
        );
        assert_eq!(
            events[2],
            RawEvent::MacroBlock {
                name: "code".into(),
                params: WikiParameters::new().with("lang", "rust"),
                content: None,
            }
        );
    }

    #[test]
    fn parameters_parse_quoted_and_bare_values() {
        let params = parse_parameters(r#"a="x y" b=2 flag"#);
        assert_eq!(params.get("a"), Some("x y"));
        assert_eq!(params.get("b"), Some("2"));
        assert_eq!(params.get("flag"), Some(""));
    }
}

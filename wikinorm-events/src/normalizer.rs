//! The event normalizer: raw grammar events in, canonical events out.
//!
//! [`EventNormalizer`] is a push-based state machine. A source parser calls one
//! method per raw event (directly, or through [`RawListener::on_raw`]) and the
//! normalizer writes zero or more [`Event`]s to the top of its [`ListenerStack`].
//!
//! Three pieces of state make it more than a one-to-one mapping:
//!
//! - the [`FormatStack`]: format closes are deferred, and every non-format event
//!   first flushes the pending close (see [`crate::common::format_stack`]);
//! - the header capture: header content is buffered until the header ends, because
//!   the header's id is derived from its text and must come first;
//! - the document depth: only the outermost document yields `StartDocument`,
//!   nested ones (macro content, for instance) become groups.
//!
//! A normalizer handles exactly one document. Create a new one per parse so that
//! ids and open scopes never leak between documents.

use crate::common::format_stack::{FormatStack, StyleTable};
use crate::common::ids::IdGenerator;
use crate::common::label::InlineLabelReparser;
use crate::error::ParseFailure;
use crate::ir::events::{Event, ListType, MetaData, SYNTAX_METADATA};
use crate::ir::parameters::Parameters;
use crate::ir::raw::{RawEvent, WikiFormat, WikiParameters, WikiReference};
use crate::listener::{Listener, ListenerStack};
use crate::parser::{RawListener, SourceEventParser};
use crate::references::{ReferenceKind, ReferenceResolver};

/// Extension name that marks an explicit anchor.
pub const ID_EXTENSION: &str = "id";

/// External collaborators of a normalizer.
///
/// The parser is needed to re-parse link labels. A missing resolver disables the
/// corresponding reference kind: such references are dropped.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub parser: &'a dyn SourceEventParser,
    pub link_resolver: Option<&'a dyn ReferenceResolver>,
    pub image_resolver: Option<&'a dyn ReferenceResolver>,
}

impl<'a> Collaborators<'a> {
    pub fn new(parser: &'a dyn SourceEventParser) -> Self {
        Self {
            parser,
            link_resolver: None,
            image_resolver: None,
        }
    }

    pub fn with_link_resolver(mut self, resolver: &'a dyn ReferenceResolver) -> Self {
        self.link_resolver = Some(resolver);
        self
    }

    pub fn with_image_resolver(mut self, resolver: &'a dyn ReferenceResolver) -> Self {
        self.image_resolver = Some(resolver);
        self
    }

    fn resolver(&self, kind: ReferenceKind) -> Option<&'a dyn ReferenceResolver> {
        match kind {
            ReferenceKind::Link => self.link_resolver,
            ReferenceKind::Image => self.image_resolver,
        }
    }
}

/// Tunables of the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerOptions {
    /// Prefix of generated header ids. Must be non-empty ASCII letters.
    pub header_id_prefix: String,
    /// Word prepended to labels before they are re-parsed.
    pub label_marker: String,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            header_id_prefix: "H".to_string(),
            label_marker: "wikimarker".to_string(),
        }
    }
}

/// Translates one document's raw events into normalized events.
pub struct EventNormalizer<'a> {
    collaborators: Collaborators<'a>,
    options: NormalizerOptions,
    styles: StyleTable,
    formats: FormatStack,
    listeners: ListenerStack<'a>,
    ids: IdGenerator,
    document_depth: usize,
    metadata: MetaData,
    header_format_depths: Vec<usize>,
}

impl<'a> EventNormalizer<'a> {
    pub fn new(
        collaborators: Collaborators<'a>,
        options: NormalizerOptions,
        listener: impl Listener + 'a,
    ) -> Self {
        Self {
            collaborators,
            options,
            styles: StyleTable::new(),
            formats: FormatStack::new(),
            listeners: ListenerStack::new(listener),
            ids: IdGenerator::new(),
            document_depth: 0,
            metadata: MetaData::new(),
            header_format_depths: Vec::new(),
        }
    }

    pub fn document_depth(&self) -> usize {
        self.document_depth
    }

    pub fn is_in_header(&self) -> bool {
        !self.header_format_depths.is_empty()
    }

    /// Flushes any pending format close and reports whether the stream was complete.
    pub fn finish(mut self) -> Result<(), ParseFailure> {
        self.flush();
        let open = self.document_depth + self.header_format_depths.len();
        if open > 0 {
            return Err(ParseFailure::unterminated(open));
        }
        Ok(())
    }

    fn emit(&mut self, event: Event) {
        self.listeners.top().on_event(event);
    }

    fn flush(&mut self) {
        self.formats.flush(&self.styles, self.listeners.top());
    }

    /// Flush, then emit.
    fn boundary(&mut self, event: Event) {
        self.flush();
        self.emit(event);
    }

    // Documents

    pub fn begin_document(&mut self, params: &WikiParameters) {
        self.flush();
        if self.document_depth == 0 {
            let mut metadata = Parameters::from(params);
            metadata.insert(SYNTAX_METADATA, self.collaborators.parser.syntax());
            self.metadata = metadata.clone();
            self.emit(Event::StartDocument(metadata));
        } else {
            self.emit(Event::StartGroup(Parameters::from(params)));
        }
        self.document_depth += 1;
    }

    /// # Panics
    ///
    /// When no document is open.
    pub fn end_document(&mut self, params: &WikiParameters) {
        self.flush();
        assert!(
            self.document_depth > 0,
            "document depth underflow: end of document without a beginning"
        );
        self.document_depth -= 1;
        if self.document_depth == 0 {
            self.formats.close_above(0, &self.styles, self.listeners.top());
            let metadata = std::mem::take(&mut self.metadata);
            self.emit(Event::EndDocument(metadata));
        } else {
            self.emit(Event::EndGroup(Parameters::from(params)));
        }
    }

    // Sections and headers

    pub fn begin_section(&mut self, header_level: usize, params: &WikiParameters) {
        self.flush();
        if header_level > 0 {
            self.emit(Event::StartSection(Parameters::from(params)));
        }
    }

    pub fn end_section(&mut self, header_level: usize, params: &WikiParameters) {
        self.flush();
        if header_level > 0 {
            self.emit(Event::EndSection(Parameters::from(params)));
        }
    }

    /// Starts buffering: nothing of the header reaches the output until its end.
    pub fn begin_header(&mut self) {
        self.flush();
        self.header_format_depths.push(self.formats.depth());
        self.listeners.push_capture();
    }

    /// Derives the header id from the buffered text, then replays the header.
    ///
    /// # Panics
    ///
    /// When no header is open.
    pub fn end_header(&mut self, level: usize, params: &WikiParameters) {
        self.flush();
        let Some(format_depth) = self.header_format_depths.pop() else {
            panic!("header end without a matching header capture");
        };
        self.formats
            .close_above(format_depth, &self.styles, self.listeners.top());

        let (buffer, text) = self.listeners.pop_capture().into_parts();
        let id = self
            .ids
            .generate_unique_id(&self.options.header_id_prefix, text.as_str());
        let parameters = Parameters::from(params);

        self.emit(Event::StartHeader {
            level,
            id: id.clone(),
            parameters: parameters.clone(),
        });
        buffer.consume_events(self.listeners.top());
        self.emit(Event::EndHeader {
            level,
            id,
            parameters,
        });
    }

    // Blocks

    pub fn begin_paragraph(&mut self, params: &WikiParameters) {
        self.boundary(Event::StartParagraph(Parameters::from(params)));
    }

    pub fn end_paragraph(&mut self, params: &WikiParameters) {
        self.boundary(Event::EndParagraph(Parameters::from(params)));
    }

    pub fn begin_list(&mut self, ordered: bool, params: &WikiParameters) {
        self.boundary(Event::StartList {
            kind: list_type(ordered),
            parameters: Parameters::from(params),
        });
    }

    pub fn end_list(&mut self, ordered: bool, params: &WikiParameters) {
        self.boundary(Event::EndList {
            kind: list_type(ordered),
            parameters: Parameters::from(params),
        });
    }

    pub fn begin_list_item(&mut self) {
        self.boundary(Event::StartListItem);
    }

    pub fn end_list_item(&mut self) {
        self.boundary(Event::EndListItem);
    }

    pub fn begin_definition_list(&mut self, params: &WikiParameters) {
        self.boundary(Event::StartDefinitionList(Parameters::from(params)));
    }

    pub fn end_definition_list(&mut self, params: &WikiParameters) {
        self.boundary(Event::EndDefinitionList(Parameters::from(params)));
    }

    pub fn begin_definition_term(&mut self) {
        self.boundary(Event::StartDefinitionTerm);
    }

    pub fn end_definition_term(&mut self) {
        self.boundary(Event::EndDefinitionTerm);
    }

    pub fn begin_definition_description(&mut self) {
        self.boundary(Event::StartDefinitionDescription);
    }

    pub fn end_definition_description(&mut self) {
        self.boundary(Event::EndDefinitionDescription);
    }

    pub fn begin_quotation(&mut self, params: &WikiParameters) {
        self.boundary(Event::StartQuotation(Parameters::from(params)));
    }

    pub fn end_quotation(&mut self, params: &WikiParameters) {
        self.boundary(Event::EndQuotation(Parameters::from(params)));
    }

    pub fn begin_quotation_line(&mut self) {
        self.boundary(Event::StartQuotationLine);
    }

    pub fn end_quotation_line(&mut self) {
        self.boundary(Event::EndQuotationLine);
    }

    pub fn begin_table(&mut self, params: &WikiParameters) {
        self.boundary(Event::StartTable(Parameters::from(params)));
    }

    pub fn end_table(&mut self, params: &WikiParameters) {
        self.boundary(Event::EndTable(Parameters::from(params)));
    }

    pub fn begin_table_row(&mut self, params: &WikiParameters) {
        self.boundary(Event::StartTableRow(Parameters::from(params)));
    }

    pub fn end_table_row(&mut self, params: &WikiParameters) {
        self.boundary(Event::EndTableRow(Parameters::from(params)));
    }

    pub fn begin_table_cell(&mut self, head: bool, params: &WikiParameters) {
        let parameters = Parameters::from(params);
        self.boundary(if head {
            Event::StartTableHeadCell(parameters)
        } else {
            Event::StartTableCell(parameters)
        });
    }

    pub fn end_table_cell(&mut self, head: bool, params: &WikiParameters) {
        let parameters = Parameters::from(params);
        self.boundary(if head {
            Event::EndTableHeadCell(parameters)
        } else {
            Event::EndTableCell(parameters)
        });
    }

    // Inline formatting

    pub fn begin_format(&mut self, format: &WikiFormat) {
        self.formats
            .open(format, &self.styles, self.listeners.top());
    }

    /// Closing is deferred; see [`FormatStack::request_close`].
    pub fn end_format(&mut self, format: WikiFormat) {
        self.formats.request_close(format);
    }

    // Leaves

    pub fn on_horizontal_line(&mut self, params: &WikiParameters) {
        self.boundary(Event::HorizontalLine(Parameters::from(params)));
    }

    pub fn on_new_line(&mut self) {
        self.boundary(Event::NewLine);
    }

    /// Line breaks and new lines are the same thing once normalized.
    pub fn on_line_break(&mut self) {
        self.boundary(Event::NewLine);
    }

    pub fn on_empty_lines(&mut self, count: usize) {
        self.boundary(Event::EmptyLines(count));
    }

    pub fn on_macro(
        &mut self,
        name: &str,
        params: &WikiParameters,
        content: Option<String>,
        inline: bool,
    ) {
        self.boundary(Event::Macro {
            name: name.to_string(),
            parameters: Parameters::from(params),
            content,
            inline,
        });
    }

    pub fn on_verbatim(&mut self, content: String, inline: bool, params: &WikiParameters) {
        self.boundary(Event::Verbatim {
            content,
            inline,
            parameters: Parameters::from(params),
        });
    }

    pub fn on_word(&mut self, word: String) {
        self.boundary(Event::Word(word));
    }

    /// One `Space` per character of the run.
    pub fn on_space(&mut self, run: &str) {
        self.flush();
        for _ in run.chars() {
            self.emit(Event::Space);
        }
    }

    /// One `SpecialSymbol` per character of the run.
    pub fn on_special_symbol(&mut self, run: &str) {
        self.flush();
        for symbol in run.chars() {
            self.emit(Event::SpecialSymbol(symbol));
        }
    }

    pub fn on_escape(&mut self, escaped: &str) {
        log::trace!("ignoring escape sequence {escaped:?}");
    }

    pub fn on_extension(&mut self, name: &str, params: &WikiParameters) {
        match (name, params.get("name")) {
            (ID_EXTENSION, Some(id)) => self.boundary(Event::Id(id.to_string())),
            _ => log::debug!("ignoring unsupported extension '{name}'"),
        }
    }

    // References

    pub fn on_reference(&mut self, reference: &WikiReference, free_standing: bool) {
        self.reference(ReferenceKind::Link, reference, free_standing);
    }

    pub fn on_image(&mut self, reference: &WikiReference, free_standing: bool) {
        self.reference(ReferenceKind::Image, reference, free_standing);
    }

    fn reference(&mut self, kind: ReferenceKind, raw: &WikiReference, free_standing: bool) {
        self.flush();
        let Some(resolver) = self.collaborators.resolver(kind) else {
            log::debug!("no {kind:?} resolver configured, dropping reference '{}'", raw.link);
            return;
        };

        let reference = resolver.resolve(&raw.link);
        let parameters = Parameters::from(&raw.params);
        let children = match raw.label.as_deref() {
            Some(label) if !label.is_empty() => {
                InlineLabelReparser::new(self.collaborators, &self.options)
                    .reparse(label)
                    .unwrap_or_else(|err| {
                        log::warn!("failed to parse label {label:?} of '{}': {err}", raw.link);
                        Vec::new()
                    })
            }
            _ => Vec::new(),
        };

        let (start, end) = match kind {
            ReferenceKind::Link => (
                Event::StartLink {
                    reference: reference.clone(),
                    free_standing,
                    parameters: parameters.clone(),
                },
                Event::EndLink {
                    reference,
                    free_standing,
                    parameters,
                },
            ),
            ReferenceKind::Image => (
                Event::StartImage {
                    reference: reference.clone(),
                    free_standing,
                    parameters: parameters.clone(),
                },
                Event::EndImage {
                    reference,
                    free_standing,
                    parameters,
                },
            ),
        };

        self.emit(start);
        for child in children {
            self.emit(child);
        }
        self.emit(end);
    }
}

fn list_type(ordered: bool) -> ListType {
    if ordered {
        ListType::Numbered
    } else {
        ListType::Bulleted
    }
}

impl RawListener for EventNormalizer<'_> {
    fn on_raw(&mut self, event: RawEvent) {
        match event {
            RawEvent::BeginDocument(params) => self.begin_document(&params),
            RawEvent::EndDocument(params) => self.end_document(&params),
            RawEvent::BeginSection {
                header_level,
                params,
                ..
            } => self.begin_section(header_level, &params),
            RawEvent::EndSection {
                header_level,
                params,
                ..
            } => self.end_section(header_level, &params),
            RawEvent::BeginHeader { .. } => self.begin_header(),
            RawEvent::EndHeader { level, params } => self.end_header(level, &params),
            RawEvent::BeginParagraph(params) => self.begin_paragraph(&params),
            RawEvent::EndParagraph(params) => self.end_paragraph(&params),
            RawEvent::BeginList { ordered, params } => self.begin_list(ordered, &params),
            RawEvent::EndList { ordered, params } => self.end_list(ordered, &params),
            RawEvent::BeginListItem => self.begin_list_item(),
            RawEvent::EndListItem => self.end_list_item(),
            RawEvent::BeginDefinitionList(params) => self.begin_definition_list(&params),
            RawEvent::EndDefinitionList(params) => self.end_definition_list(&params),
            RawEvent::BeginDefinitionTerm => self.begin_definition_term(),
            RawEvent::EndDefinitionTerm => self.end_definition_term(),
            RawEvent::BeginDefinitionDescription => self.begin_definition_description(),
            RawEvent::EndDefinitionDescription => self.end_definition_description(),
            RawEvent::BeginQuotation(params) => self.begin_quotation(&params),
            RawEvent::EndQuotation(params) => self.end_quotation(&params),
            RawEvent::BeginQuotationLine => self.begin_quotation_line(),
            RawEvent::EndQuotationLine => self.end_quotation_line(),
            RawEvent::BeginTable(params) => self.begin_table(&params),
            RawEvent::EndTable(params) => self.end_table(&params),
            RawEvent::BeginTableRow(params) => self.begin_table_row(&params),
            RawEvent::EndTableRow(params) => self.end_table_row(&params),
            RawEvent::BeginTableCell { head, params } => self.begin_table_cell(head, &params),
            RawEvent::EndTableCell { head, params } => self.end_table_cell(head, &params),
            RawEvent::BeginFormat(format) => self.begin_format(&format),
            RawEvent::EndFormat(format) => self.end_format(format),
            RawEvent::HorizontalLine(params) => self.on_horizontal_line(&params),
            RawEvent::LineBreak => self.on_line_break(),
            RawEvent::NewLine => self.on_new_line(),
            RawEvent::EmptyLines(count) => self.on_empty_lines(count),
            RawEvent::MacroBlock {
                name,
                params,
                content,
            } => self.on_macro(&name, &params, content, false),
            RawEvent::MacroInline {
                name,
                params,
                content,
            } => self.on_macro(&name, &params, content, true),
            RawEvent::VerbatimBlock { content, params } => {
                self.on_verbatim(content, false, &params)
            }
            RawEvent::VerbatimInline { content, params } => {
                self.on_verbatim(content, true, &params)
            }
            RawEvent::Word(word) => self.on_word(word),
            RawEvent::Space(run) => self.on_space(&run),
            RawEvent::SpecialSymbol(run) => self.on_special_symbol(&run),
            RawEvent::Escape(escaped) => self.on_escape(&escaped),
            RawEvent::Reference(reference) => self.on_reference(&reference, false),
            RawEvent::FreeStandingReference(raw) => {
                self.on_reference(&WikiReference::new(raw), true)
            }
            RawEvent::Image(reference) => self.on_image(&reference, false),
            RawEvent::FreeStandingImage(raw) => self.on_image(&WikiReference::new(raw), true),
            RawEvent::ExtensionBlock { name, params }
            | RawEvent::ExtensionInline { name, params } => self.on_extension(&name, &params),
        }
    }
}

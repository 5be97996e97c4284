//! Defines the normalized, syntax-independent event stream.

use crate::ir::parameters::Parameters;
use crate::references::ResourceReference;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Document-level metadata carried by the outermost document events.
pub type MetaData = Parameters;

/// Metadata key holding the syntax id of the source parser.
pub const SYNTAX_METADATA: &str = "syntax";

/// Canonical inline style kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Bold,
    Italic,
    Underline,
    Strikeout,
    Subscript,
    Superscript,
    Monospace,
    None,
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Format::Bold => "bold",
            Format::Italic => "italic",
            Format::Underline => "underline",
            Format::Strikeout => "strikeout",
            Format::Subscript => "subscript",
            Format::Superscript => "superscript",
            Format::Monospace => "monospace",
            Format::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    Bulleted,
    Numbered,
}

/// Represents a single event in the normalized document stream.
///
/// Containers come as `Start*`/`End*` pairs; everything else is a leaf. Every
/// event that takes parameters carries them as an ordered [`Parameters`] map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    StartDocument(MetaData),
    EndDocument(MetaData),
    /// A nested document (for example the body of a macro) below the top level.
    StartGroup(Parameters),
    EndGroup(Parameters),
    StartSection(Parameters),
    EndSection(Parameters),
    StartHeader {
        level: usize,
        id: String,
        parameters: Parameters,
    },
    EndHeader {
        level: usize,
        id: String,
        parameters: Parameters,
    },
    StartParagraph(Parameters),
    EndParagraph(Parameters),
    StartList {
        kind: ListType,
        parameters: Parameters,
    },
    EndList {
        kind: ListType,
        parameters: Parameters,
    },
    StartListItem,
    EndListItem,
    StartDefinitionList(Parameters),
    EndDefinitionList(Parameters),
    StartDefinitionTerm,
    EndDefinitionTerm,
    StartDefinitionDescription,
    EndDefinitionDescription,
    StartQuotation(Parameters),
    EndQuotation(Parameters),
    StartQuotationLine,
    EndQuotationLine,
    StartTable(Parameters),
    EndTable(Parameters),
    StartTableRow(Parameters),
    EndTableRow(Parameters),
    StartTableCell(Parameters),
    EndTableCell(Parameters),
    StartTableHeadCell(Parameters),
    EndTableHeadCell(Parameters),
    StartFormat {
        format: Format,
        parameters: Parameters,
    },
    EndFormat {
        format: Format,
        parameters: Parameters,
    },
    StartLink {
        reference: ResourceReference,
        free_standing: bool,
        parameters: Parameters,
    },
    EndLink {
        reference: ResourceReference,
        free_standing: bool,
        parameters: Parameters,
    },
    StartImage {
        reference: ResourceReference,
        free_standing: bool,
        parameters: Parameters,
    },
    EndImage {
        reference: ResourceReference,
        free_standing: bool,
        parameters: Parameters,
    },
    Macro {
        name: String,
        parameters: Parameters,
        content: Option<String>,
        inline: bool,
    },
    HorizontalLine(Parameters),
    NewLine,
    EmptyLines(usize),
    Space,
    Word(String),
    SpecialSymbol(char),
    Verbatim {
        content: String,
        inline: bool,
        parameters: Parameters,
    },
    Id(String),
}

impl Event {
    /// The construct this event belongs to, shared by a start event and its end.
    pub fn name(&self) -> &'static str {
        match self {
            Event::StartDocument(_) | Event::EndDocument(_) => "Document",
            Event::StartGroup(_) | Event::EndGroup(_) => "Group",
            Event::StartSection(_) | Event::EndSection(_) => "Section",
            Event::StartHeader { .. } | Event::EndHeader { .. } => "Header",
            Event::StartParagraph(_) | Event::EndParagraph(_) => "Paragraph",
            Event::StartList { .. } | Event::EndList { .. } => "List",
            Event::StartListItem | Event::EndListItem => "ListItem",
            Event::StartDefinitionList(_) | Event::EndDefinitionList(_) => "DefinitionList",
            Event::StartDefinitionTerm | Event::EndDefinitionTerm => "DefinitionTerm",
            Event::StartDefinitionDescription | Event::EndDefinitionDescription => {
                "DefinitionDescription"
            }
            Event::StartQuotation(_) | Event::EndQuotation(_) => "Quotation",
            Event::StartQuotationLine | Event::EndQuotationLine => "QuotationLine",
            Event::StartTable(_) | Event::EndTable(_) => "Table",
            Event::StartTableRow(_) | Event::EndTableRow(_) => "TableRow",
            Event::StartTableCell(_) | Event::EndTableCell(_) => "TableCell",
            Event::StartTableHeadCell(_) | Event::EndTableHeadCell(_) => "TableHeadCell",
            Event::StartFormat { .. } | Event::EndFormat { .. } => "Format",
            Event::StartLink { .. } | Event::EndLink { .. } => "Link",
            Event::StartImage { .. } | Event::EndImage { .. } => "Image",
            Event::Macro { .. } => "Macro",
            Event::HorizontalLine(_) => "HorizontalLine",
            Event::NewLine => "NewLine",
            Event::EmptyLines(_) => "EmptyLines",
            Event::Space => "Space",
            Event::Word(_) => "Word",
            Event::SpecialSymbol(_) => "SpecialSymbol",
            Event::Verbatim { .. } => "Verbatim",
            Event::Id(_) => "Id",
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(
            self,
            Event::StartDocument(_)
                | Event::StartGroup(_)
                | Event::StartSection(_)
                | Event::StartHeader { .. }
                | Event::StartParagraph(_)
                | Event::StartList { .. }
                | Event::StartListItem
                | Event::StartDefinitionList(_)
                | Event::StartDefinitionTerm
                | Event::StartDefinitionDescription
                | Event::StartQuotation(_)
                | Event::StartQuotationLine
                | Event::StartTable(_)
                | Event::StartTableRow(_)
                | Event::StartTableCell(_)
                | Event::StartTableHeadCell(_)
                | Event::StartFormat { .. }
                | Event::StartLink { .. }
                | Event::StartImage { .. }
        )
    }

    pub fn is_end(&self) -> bool {
        matches!(
            self,
            Event::EndDocument(_)
                | Event::EndGroup(_)
                | Event::EndSection(_)
                | Event::EndHeader { .. }
                | Event::EndParagraph(_)
                | Event::EndList { .. }
                | Event::EndListItem
                | Event::EndDefinitionList(_)
                | Event::EndDefinitionTerm
                | Event::EndDefinitionDescription
                | Event::EndQuotation(_)
                | Event::EndQuotationLine
                | Event::EndTable(_)
                | Event::EndTableRow(_)
                | Event::EndTableCell(_)
                | Event::EndTableHeadCell(_)
                | Event::EndFormat { .. }
                | Event::EndLink { .. }
                | Event::EndImage { .. }
        )
    }

    fn parameters(&self) -> Option<&Parameters> {
        match self {
            Event::StartDocument(p)
            | Event::EndDocument(p)
            | Event::StartGroup(p)
            | Event::EndGroup(p)
            | Event::StartSection(p)
            | Event::EndSection(p)
            | Event::StartParagraph(p)
            | Event::EndParagraph(p)
            | Event::StartDefinitionList(p)
            | Event::EndDefinitionList(p)
            | Event::StartQuotation(p)
            | Event::EndQuotation(p)
            | Event::StartTable(p)
            | Event::EndTable(p)
            | Event::StartTableRow(p)
            | Event::EndTableRow(p)
            | Event::StartTableCell(p)
            | Event::EndTableCell(p)
            | Event::StartTableHeadCell(p)
            | Event::EndTableHeadCell(p)
            | Event::HorizontalLine(p) => Some(p),
            Event::StartHeader { parameters, .. }
            | Event::EndHeader { parameters, .. }
            | Event::StartList { parameters, .. }
            | Event::EndList { parameters, .. }
            | Event::StartFormat { parameters, .. }
            | Event::EndFormat { parameters, .. }
            | Event::StartLink { parameters, .. }
            | Event::EndLink { parameters, .. }
            | Event::StartImage { parameters, .. }
            | Event::EndImage { parameters, .. }
            | Event::Macro { parameters, .. }
            | Event::Verbatim { parameters, .. } => Some(parameters),
            _ => None,
        }
    }
}

/// One-line listing form, e.g. `StartHeader(1, HIntro)` or `Word(hello)`.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.is_start() {
            "Start"
        } else if self.is_end() {
            "End"
        } else {
            ""
        };
        write!(f, "{prefix}{}", self.name())?;

        match self {
            Event::StartHeader { level, id, .. } | Event::EndHeader { level, id, .. } => {
                write!(f, "({level}, {id})")?
            }
            Event::StartList { kind, .. } | Event::EndList { kind, .. } => {
                let kind = match kind {
                    ListType::Bulleted => "bulleted",
                    ListType::Numbered => "numbered",
                };
                write!(f, "({kind})")?
            }
            Event::StartFormat { format, .. } | Event::EndFormat { format, .. } => {
                write!(f, "({})", format.name())?
            }
            Event::StartLink {
                reference,
                free_standing,
                ..
            }
            | Event::EndLink {
                reference,
                free_standing,
                ..
            }
            | Event::StartImage {
                reference,
                free_standing,
                ..
            }
            | Event::EndImage {
                reference,
                free_standing,
                ..
            } => {
                write!(f, "({reference}")?;
                if *free_standing {
                    f.write_str(", free")?;
                }
                f.write_str(")")?
            }
            Event::Macro { name, inline, .. } => {
                write!(f, "({name}")?;
                if *inline {
                    f.write_str(", inline")?;
                }
                f.write_str(")")?
            }
            Event::Verbatim {
                content, inline, ..
            } => {
                write!(f, "({content:?}")?;
                if *inline {
                    f.write_str(", inline")?;
                }
                f.write_str(")")?
            }
            Event::EmptyLines(count) => write!(f, "({count})")?,
            Event::Word(word) => write!(f, "({word})")?,
            Event::SpecialSymbol(symbol) => write!(f, "({symbol})")?,
            Event::Id(name) => write!(f, "({name})")?,
            _ => {}
        }

        if let Some(parameters) = self.parameters() {
            if !parameters.is_empty() {
                write!(f, " [{parameters}]")?;
            }
        }
        Ok(())
    }
}

/// Renders a stream as one event per line.
pub fn listing(events: &[Event]) -> String {
    events
        .iter()
        .map(|event| event.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_end_share_a_name() {
        let start = Event::StartParagraph(Parameters::new());
        let end = Event::EndParagraph(Parameters::new());
        assert_eq!(start.name(), end.name());
        assert!(start.is_start() && !start.is_end());
        assert!(end.is_end() && !end.is_start());
        assert!(!Event::Space.is_start() && !Event::Space.is_end());
    }

    #[test]
    fn listing_shows_payload_and_parameters() {
        let events = vec![
            Event::StartHeader {
                level: 1,
                id: "HIntro".into(),
                parameters: Parameters::new(),
            },
            Event::StartFormat {
                format: Format::Bold,
                parameters: Parameters::new().with("class", "x"),
            },
            Event::Word("Intro".into()),
            Event::SpecialSymbol('!'),
            Event::Space,
        ];
        assert_eq!(
            listing(&events),
            "StartHeader(1, HIntro)\nStartFormat(bold) [class=\"x\"]\nWord(Intro)\nSpecialSymbol(!)\nSpace"
        );
    }

    #[test]
    fn document_metadata_is_listed() {
        let metadata = MetaData::new().with(SYNTAX_METADATA, "sketch/1.0");
        assert_eq!(
            Event::StartDocument(metadata).to_string(),
            "StartDocument [syntax=\"sketch/1.0\"]"
        );
    }
}

//! Core data structures for the document tree.
//!
//! The tree is the nested twin of the normalized event stream: every `Start*`/`End*`
//! pair becomes a [`Container`], every other event a [`Leaf`]. Nothing is added or
//! lost, so a tree can always be walked back into the exact stream it came from.

use crate::ir::events::{Event, Format, ListType, MetaData};
use crate::ir::parameters::Parameters;
use crate::references::ResourceReference;
use serde::{Deserialize, Serialize};

/// Represents the root of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub metadata: MetaData,
    pub children: Vec<DocNode>,
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocNode {
    Container(Container),
    Leaf(Leaf),
}

/// A node that had a start and an end event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub kind: ContainerKind,
    pub children: Vec<DocNode>,
}

impl Container {
    pub fn new(kind: ContainerKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Group(Parameters),
    Section(Parameters),
    Header {
        level: usize,
        id: String,
        parameters: Parameters,
    },
    Paragraph(Parameters),
    List {
        kind: ListType,
        parameters: Parameters,
    },
    ListItem,
    DefinitionList(Parameters),
    DefinitionTerm,
    DefinitionDescription,
    Quotation(Parameters),
    QuotationLine,
    Table(Parameters),
    TableRow(Parameters),
    TableCell(Parameters),
    TableHeadCell(Parameters),
    Format {
        format: Format,
        parameters: Parameters,
    },
    Link {
        reference: ResourceReference,
        free_standing: bool,
        parameters: Parameters,
    },
    Image {
        reference: ResourceReference,
        free_standing: bool,
        parameters: Parameters,
    },
}

impl ContainerKind {
    /// The container opened by `event`, if it is a start event other than the
    /// document start.
    pub fn from_start(event: &Event) -> Option<Self> {
        let kind = match event {
            Event::StartGroup(p) => ContainerKind::Group(p.clone()),
            Event::StartSection(p) => ContainerKind::Section(p.clone()),
            Event::StartHeader {
                level,
                id,
                parameters,
            } => ContainerKind::Header {
                level: *level,
                id: id.clone(),
                parameters: parameters.clone(),
            },
            Event::StartParagraph(p) => ContainerKind::Paragraph(p.clone()),
            Event::StartList { kind, parameters } => ContainerKind::List {
                kind: *kind,
                parameters: parameters.clone(),
            },
            Event::StartListItem => ContainerKind::ListItem,
            Event::StartDefinitionList(p) => ContainerKind::DefinitionList(p.clone()),
            Event::StartDefinitionTerm => ContainerKind::DefinitionTerm,
            Event::StartDefinitionDescription => ContainerKind::DefinitionDescription,
            Event::StartQuotation(p) => ContainerKind::Quotation(p.clone()),
            Event::StartQuotationLine => ContainerKind::QuotationLine,
            Event::StartTable(p) => ContainerKind::Table(p.clone()),
            Event::StartTableRow(p) => ContainerKind::TableRow(p.clone()),
            Event::StartTableCell(p) => ContainerKind::TableCell(p.clone()),
            Event::StartTableHeadCell(p) => ContainerKind::TableHeadCell(p.clone()),
            Event::StartFormat { format, parameters } => ContainerKind::Format {
                format: *format,
                parameters: parameters.clone(),
            },
            Event::StartLink {
                reference,
                free_standing,
                parameters,
            } => ContainerKind::Link {
                reference: reference.clone(),
                free_standing: *free_standing,
                parameters: parameters.clone(),
            },
            Event::StartImage {
                reference,
                free_standing,
                parameters,
            } => ContainerKind::Image {
                reference: reference.clone(),
                free_standing: *free_standing,
                parameters: parameters.clone(),
            },
            _ => return None,
        };
        Some(kind)
    }

    pub fn start_event(&self) -> Event {
        self.to_event(true)
    }

    pub fn end_event(&self) -> Event {
        self.to_event(false)
    }

    pub fn name(&self) -> &'static str {
        self.start_event().name()
    }

    fn to_event(&self, start: bool) -> Event {
        macro_rules! pair {
            ($start:expr, $end:expr) => {
                if start {
                    $start
                } else {
                    $end
                }
            };
        }

        match self.clone() {
            ContainerKind::Group(p) => pair!(Event::StartGroup(p), Event::EndGroup(p)),
            ContainerKind::Section(p) => pair!(Event::StartSection(p), Event::EndSection(p)),
            ContainerKind::Header {
                level,
                id,
                parameters,
            } => pair!(
                Event::StartHeader {
                    level,
                    id,
                    parameters
                },
                Event::EndHeader {
                    level,
                    id,
                    parameters
                }
            ),
            ContainerKind::Paragraph(p) => {
                pair!(Event::StartParagraph(p), Event::EndParagraph(p))
            }
            ContainerKind::List { kind, parameters } => pair!(
                Event::StartList { kind, parameters },
                Event::EndList { kind, parameters }
            ),
            ContainerKind::ListItem => pair!(Event::StartListItem, Event::EndListItem),
            ContainerKind::DefinitionList(p) => {
                pair!(Event::StartDefinitionList(p), Event::EndDefinitionList(p))
            }
            ContainerKind::DefinitionTerm => {
                pair!(Event::StartDefinitionTerm, Event::EndDefinitionTerm)
            }
            ContainerKind::DefinitionDescription => pair!(
                Event::StartDefinitionDescription,
                Event::EndDefinitionDescription
            ),
            ContainerKind::Quotation(p) => {
                pair!(Event::StartQuotation(p), Event::EndQuotation(p))
            }
            ContainerKind::QuotationLine => {
                pair!(Event::StartQuotationLine, Event::EndQuotationLine)
            }
            ContainerKind::Table(p) => pair!(Event::StartTable(p), Event::EndTable(p)),
            ContainerKind::TableRow(p) => pair!(Event::StartTableRow(p), Event::EndTableRow(p)),
            ContainerKind::TableCell(p) => {
                pair!(Event::StartTableCell(p), Event::EndTableCell(p))
            }
            ContainerKind::TableHeadCell(p) => {
                pair!(Event::StartTableHeadCell(p), Event::EndTableHeadCell(p))
            }
            ContainerKind::Format { format, parameters } => pair!(
                Event::StartFormat { format, parameters },
                Event::EndFormat { format, parameters }
            ),
            ContainerKind::Link {
                reference,
                free_standing,
                parameters,
            } => pair!(
                Event::StartLink {
                    reference,
                    free_standing,
                    parameters
                },
                Event::EndLink {
                    reference,
                    free_standing,
                    parameters
                }
            ),
            ContainerKind::Image {
                reference,
                free_standing,
                parameters,
            } => pair!(
                Event::StartImage {
                    reference,
                    free_standing,
                    parameters
                },
                Event::EndImage {
                    reference,
                    free_standing,
                    parameters
                }
            ),
        }
    }
}

/// A node from a single event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leaf {
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

impl Leaf {
    pub fn from_event(event: &Event) -> Option<Self> {
        let leaf = match event.clone() {
            Event::Macro {
                name,
                parameters,
                content,
                inline,
            } => Leaf::Macro {
                name,
                parameters,
                content,
                inline,
            },
            Event::HorizontalLine(p) => Leaf::HorizontalLine(p),
            Event::NewLine => Leaf::NewLine,
            Event::EmptyLines(count) => Leaf::EmptyLines(count),
            Event::Space => Leaf::Space,
            Event::Word(word) => Leaf::Word(word),
            Event::SpecialSymbol(symbol) => Leaf::SpecialSymbol(symbol),
            Event::Verbatim {
                content,
                inline,
                parameters,
            } => Leaf::Verbatim {
                content,
                inline,
                parameters,
            },
            Event::Id(name) => Leaf::Id(name),
            _ => return None,
        };
        Some(leaf)
    }

    pub fn to_event(&self) -> Event {
        match self.clone() {
            Leaf::Macro {
                name,
                parameters,
                content,
                inline,
            } => Event::Macro {
                name,
                parameters,
                content,
                inline,
            },
            Leaf::HorizontalLine(p) => Event::HorizontalLine(p),
            Leaf::NewLine => Event::NewLine,
            Leaf::EmptyLines(count) => Event::EmptyLines(count),
            Leaf::Space => Event::Space,
            Leaf::Word(word) => Event::Word(word),
            Leaf::SpecialSymbol(symbol) => Event::SpecialSymbol(symbol),
            Leaf::Verbatim {
                content,
                inline,
                parameters,
            } => Event::Verbatim {
                content,
                inline,
                parameters,
            },
            Leaf::Id(name) => Event::Id(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_kind_produces_matching_pair() {
        let start = Event::StartHeader {
            level: 2,
            id: "HUsage".into(),
            parameters: Parameters::new(),
        };
        let kind = ContainerKind::from_start(&start).unwrap();
        assert_eq!(kind.start_event(), start);
        assert_eq!(kind.end_event().to_string(), "EndHeader(2, HUsage)");
        assert_eq!(kind.name(), "Header");
    }

    #[test]
    fn end_and_leaf_events_open_no_container() {
        assert!(ContainerKind::from_start(&Event::EndListItem).is_none());
        assert!(ContainerKind::from_start(&Event::Space).is_none());
        assert!(ContainerKind::from_start(&Event::StartDocument(MetaData::new())).is_none());
        assert!(Leaf::from_event(&Event::StartListItem).is_none());
        assert_eq!(
            Leaf::from_event(&Event::SpecialSymbol('#')).map(|leaf| leaf.to_event()),
            Some(Event::SpecialSymbol('#'))
        );
    }
}

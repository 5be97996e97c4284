//! Raw event vocabulary emitted by grammar-specific source parsers.
//!
//! This is the contract every pluggable [`crate::parser::SourceEventParser`] speaks. The
//! vocabulary is close to what wiki grammars naturally produce: format markers around
//! every inline run, whitespace and punctuation as runs, references with opaque labels.
//! [`crate::normalizer::EventNormalizer`] turns it into the canonical
//! [`crate::ir::events::Event`] stream.
//!
//! All types serialize with serde so that recorded streams can be replayed (see
//! [`crate::syntaxes::recorded`]).

use crate::ir::parameters::Parameters;
use serde::{Deserialize, Serialize};

/// A single `key=value` parameter as declared in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WikiParameter(pub String, pub String);

impl WikiParameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self(key.into(), value.into())
    }

    pub fn key(&self) -> &str {
        &self.0
    }

    pub fn value(&self) -> &str {
        &self.1
    }
}

/// Parameter list in declaration order. Duplicates are allowed here; they
/// collapse when converted to [`Parameters`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WikiParameters(pub Vec<WikiParameter>);

impl WikiParameters {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push(WikiParameter::new(key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.key() == key)
            .map(WikiParameter::value)
    }
}

impl From<&WikiParameters> for Parameters {
    fn from(params: &WikiParameters) -> Self {
        params.0.iter().map(|p| (p.0.as_str(), p.1.as_str())).collect()
    }
}

impl From<&[WikiParameter]> for Parameters {
    fn from(params: &[WikiParameter]) -> Self {
        params.iter().map(|p| (p.0.as_str(), p.1.as_str())).collect()
    }
}

/// Inline style kinds a grammar may declare.
///
/// The set mirrors the styles wiki grammars commonly distinguish; anything else
/// travels as [`WikiStyle::Other`] and degrades to [`crate::ir::events::Format::None`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WikiStyle {
    Code,
    Em,
    Del,
    Ins,
    Mono,
    Strike,
    Strong,
    Sub,
    Sup,
    Tt,
    Big,
    Cite,
    Ref,
    Small,
    Other(String),
}

/// A style/parameter set declared by a format marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiFormat {
    #[serde(default)]
    pub styles: Vec<WikiStyle>,
    #[serde(default)]
    pub params: Vec<WikiParameter>,
}

impl WikiFormat {
    pub fn new(styles: Vec<WikiStyle>) -> Self {
        Self {
            styles,
            params: Vec::new(),
        }
    }

    pub fn style(style: WikiStyle) -> Self {
        Self::new(vec![style])
    }

    pub fn with_params(mut self, params: Vec<WikiParameter>) -> Self {
        self.params = params;
        self
    }

    /// Grammars emit vacuous markers around ordinary runs; those carry neither
    /// styles nor parameters.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty() && self.params.is_empty()
    }
}

/// A structured reference (`[[label>>target||params]]` style) with an opaque label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiReference {
    pub link: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub params: WikiParameters,
}

impl WikiReference {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            label: None,
            params: WikiParameters::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_params(mut self, params: WikiParameters) -> Self {
        self.params = params;
        self
    }
}

/// One raw event from a source parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawEvent {
    BeginDocument(WikiParameters),
    EndDocument(WikiParameters),
    BeginSection {
        doc_level: usize,
        header_level: usize,
        #[serde(default)]
        params: WikiParameters,
    },
    EndSection {
        doc_level: usize,
        header_level: usize,
        #[serde(default)]
        params: WikiParameters,
    },
    BeginHeader {
        level: usize,
        #[serde(default)]
        params: WikiParameters,
    },
    EndHeader {
        level: usize,
        #[serde(default)]
        params: WikiParameters,
    },
    BeginParagraph(WikiParameters),
    EndParagraph(WikiParameters),
    BeginList {
        ordered: bool,
        #[serde(default)]
        params: WikiParameters,
    },
    EndList {
        ordered: bool,
        #[serde(default)]
        params: WikiParameters,
    },
    BeginListItem,
    EndListItem,
    BeginDefinitionList(WikiParameters),
    EndDefinitionList(WikiParameters),
    BeginDefinitionTerm,
    EndDefinitionTerm,
    BeginDefinitionDescription,
    EndDefinitionDescription,
    BeginQuotation(WikiParameters),
    EndQuotation(WikiParameters),
    BeginQuotationLine,
    EndQuotationLine,
    BeginTable(WikiParameters),
    EndTable(WikiParameters),
    BeginTableRow(WikiParameters),
    EndTableRow(WikiParameters),
    BeginTableCell {
        head: bool,
        #[serde(default)]
        params: WikiParameters,
    },
    EndTableCell {
        head: bool,
        #[serde(default)]
        params: WikiParameters,
    },
    BeginFormat(WikiFormat),
    EndFormat(WikiFormat),
    HorizontalLine(WikiParameters),
    LineBreak,
    NewLine,
    EmptyLines(usize),
    MacroBlock {
        name: String,
        #[serde(default)]
        params: WikiParameters,
        #[serde(default)]
        content: Option<String>,
    },
    MacroInline {
        name: String,
        #[serde(default)]
        params: WikiParameters,
        #[serde(default)]
        content: Option<String>,
    },
    VerbatimBlock {
        content: String,
        #[serde(default)]
        params: WikiParameters,
    },
    VerbatimInline {
        content: String,
        #[serde(default)]
        params: WikiParameters,
    },
    Word(String),
    /// A run of one or more spaces.
    Space(String),
    /// A run of one or more punctuation characters.
    SpecialSymbol(String),
    Escape(String),
    Reference(WikiReference),
    /// A URI found directly in running text.
    FreeStandingReference(String),
    Image(WikiReference),
    FreeStandingImage(String),
    ExtensionBlock {
        name: String,
        #[serde(default)]
        params: WikiParameters,
    },
    ExtensionInline {
        name: String,
        #[serde(default)]
        params: WikiParameters,
    },
}

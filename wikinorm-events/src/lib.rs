//! Normalization of wiki-grammar parser events
//!
//!     Wiki grammars are event based: a parser walks the source and calls back for every
//!     structure it recognizes. What those grammars emit is close to the source, and full
//!     of grammar accidents: format markers around every single word, whitespace runs,
//!     link labels as unparsed text, headers whose anchor depends on text that has not
//!     been read yet. This crate turns that into one canonical, syntax-independent event
//!     stream that renderers and tree builders can consume without caring about the
//!     source syntax.
//!
//!     TLDR: For syntax authors:
//!         - Implement SourceEventParser (./parser.rs) for the grammar, pushing RawEvents
//!         - Never normalize in the parser; format markers around every run are fine
//!         - Provide parse_inline when the grammar has an inline entry point (labels use it)
//!         - Register the parser in a ParserRegistry to make it discoverable
//!
//! Architecture
//!
//!     SourceEventParser → EventNormalizer → ListenerStack → final consumer
//!
//!     The normalizer is push based. It holds only what it needs to decide the next
//!     emission: the stack of open style scopes, the pending format close, the document
//!     nesting depth and the header being buffered. References and labels go through
//!     the ReferenceResolver and the InlineLabelReparser before they are emitted.
//!
//!     This is a pure lib: no code here supposes a shell environment, be it printing,
//!     env vars or the file system. The wikinorm binary wraps it.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── parser.rs               # SourceEventParser trait definition
//!     ├── registry.rs             # ParserRegistry for discovery and selection
//!     ├── normalizer.rs           # EventNormalizer
//!     ├── listener.rs             # Listener trait, queues, listener stack
//!     ├── references.rs           # ResourceReference and resolvers
//!     ├── syntaxes                # Bundled source parsers
//!     ├── ir                      # Raw and normalized events, document tree
//!     ├── common                  # Format stack, ids, labels, flat <-> nested
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── common
//!     └── normalize
//!         └── <topic>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Core Algorithms
//!
//!     Two pieces carry most of the weight. The format stack (./common/format_stack.rs)
//!     closes formats lazily: a close is only remembered, and reconciled against the
//!     next open, so `**a** **b**` style runs do not stutter close/reopen pairs. Header
//!     buffering (./normalizer.rs) captures header content until the header ends, derives
//!     the id from its plain text, then replays the content behind the header start.
//!
//!     The document tree (./ir/nodes.rs) is the nested twin of the stream, see
//!     ./common/flat_to_nested.rs and ./common/nested_to_flat.rs.
//!
//! Concurrency
//!
//!     An EventNormalizer belongs to one parse. Normalizer::normalize builds fresh state
//!     on every call, so a Normalizer can be shared between threads as long as its parser
//!     and resolvers are (they are Send + Sync by contract).

pub mod common;
pub mod error;
pub mod ir;
pub mod listener;
pub mod normalizer;
pub mod parser;
pub mod references;
pub mod registry;
pub mod syntaxes;

pub use common::flat_to_nested::TreeBuilder;
pub use error::{NormalizeError, ParseFailure};
pub use ir::events::{Event, Format, ListType, MetaData};
pub use ir::nodes::Document;
pub use ir::parameters::Parameters;
pub use listener::Listener;
pub use normalizer::{Collaborators, EventNormalizer, NormalizerOptions};
pub use parser::{RawListener, SourceEventParser};
pub use references::{ImageResolver, LinkResolver, ReferenceResolver, ResourceReference};
pub use registry::ParserRegistry;

/// One-call normalization with a given parser.
///
/// Links and images are dropped unless a resolver is configured, see
/// [`Normalizer::with_default_resolvers`].
///
/// # Examples
///
/// ```ignore
/// let events = Normalizer::new(&SketchParser)
///     .with_default_resolvers()
///     .normalize_to_events("= Intro =\nSee [[the docs>>Main.Docs]].")?;
/// ```
pub struct Normalizer<'p> {
    parser: &'p dyn SourceEventParser,
    link_resolver: Option<Box<dyn ReferenceResolver>>,
    image_resolver: Option<Box<dyn ReferenceResolver>>,
    options: NormalizerOptions,
}

impl<'p> Normalizer<'p> {
    pub fn new(parser: &'p dyn SourceEventParser) -> Self {
        Self {
            parser,
            link_resolver: None,
            image_resolver: None,
            options: NormalizerOptions::default(),
        }
    }

    /// Use [`LinkResolver`] and [`ImageResolver`].
    pub fn with_default_resolvers(self) -> Self {
        self.with_link_resolver(LinkResolver)
            .with_image_resolver(ImageResolver)
    }

    pub fn with_link_resolver(mut self, resolver: impl ReferenceResolver + 'static) -> Self {
        self.link_resolver = Some(Box::new(resolver));
        self
    }

    pub fn with_image_resolver(mut self, resolver: impl ReferenceResolver + 'static) -> Self {
        self.image_resolver = Some(Box::new(resolver));
        self
    }

    pub fn with_options(mut self, options: NormalizerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &NormalizerOptions {
        &self.options
    }

    pub fn syntax(&self) -> &str {
        self.parser.syntax()
    }

    /// Parses `source` and pushes the normalized events into `listener`.
    ///
    /// Events emitted before a failure stay with the listener.
    pub fn normalize(&self, source: &str, listener: &mut dyn Listener) -> Result<(), NormalizeError> {
        let mut collaborators = Collaborators::new(self.parser);
        if let Some(resolver) = self.link_resolver.as_deref() {
            collaborators = collaborators.with_link_resolver(resolver);
        }
        if let Some(resolver) = self.image_resolver.as_deref() {
            collaborators = collaborators.with_image_resolver(resolver);
        }

        let mut normalizer = EventNormalizer::new(collaborators, self.options.clone(), listener);
        self.parser.parse(source, &mut normalizer)?;
        normalizer.finish()?;
        Ok(())
    }

    pub fn normalize_to_events(&self, source: &str) -> Result<Vec<Event>, NormalizeError> {
        let mut events = Vec::new();
        self.normalize(source, &mut events)?;
        Ok(events)
    }

    pub fn normalize_to_tree(&self, source: &str) -> Result<Document, NormalizeError> {
        let mut builder = TreeBuilder::new();
        self.normalize(source, &mut builder)?;
        Ok(builder.finish()?)
    }
}

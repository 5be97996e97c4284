//! Source parser trait definition
//!
//! A [`SourceEventParser`] is the grammar-specific half of the pipeline: it reads
//! wiki source text and pushes [`RawEvent`]s into a [`RawListener`]. It knows
//! nothing about normalized events; the normalizer sits on the receiving end.
//!
//! # Examples
//!
//! ```ignore
//! struct OneWord;
//!
//! impl SourceEventParser for OneWord {
//!     fn syntax(&self) -> &str {
//!         "one-word/1.0"
//!     }
//!
//!     fn parse(&self, source: &str, listener: &mut dyn RawListener) -> Result<(), ParseFailure> {
//!         listener.on_raw(RawEvent::BeginDocument(WikiParameters::new()));
//!         listener.on_raw(RawEvent::Word(source.to_string()));
//!         listener.on_raw(RawEvent::EndDocument(WikiParameters::new()));
//!         Ok(())
//!     }
//! }
//! ```

use crate::error::ParseFailure;
use crate::ir::raw::RawEvent;

/// Receives raw events from a source parser.
pub trait RawListener {
    fn on_raw(&mut self, event: RawEvent);
}

impl RawListener for Vec<RawEvent> {
    fn on_raw(&mut self, event: RawEvent) {
        self.push(event);
    }
}

impl<L: RawListener + ?Sized> RawListener for &mut L {
    fn on_raw(&mut self, event: RawEvent) {
        (**self).on_raw(event);
    }
}

/// A grammar-specific wiki parser.
pub trait SourceEventParser: Send + Sync {
    /// Syntax id, e.g. `sketch/1.0`. Recorded in the document metadata.
    fn syntax(&self) -> &str;

    /// Optional description of this syntax
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this syntax, without the leading dot.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Parse a full document, pushing raw events into `listener`.
    fn parse(&self, source: &str, listener: &mut dyn RawListener) -> Result<(), ParseFailure>;

    /// Parse a fragment of inline text (link labels).
    ///
    /// Grammars usually wrap inline text in a document and a paragraph anyway; the
    /// label reparser strips that wrapping. Override when the grammar has a
    /// dedicated inline entry point.
    fn parse_inline(
        &self,
        source: &str,
        listener: &mut dyn RawListener,
    ) -> Result<(), ParseFailure> {
        self.parse(source, listener)
    }
}

//! Bundled source parsers.
//!
//! Real wiki grammars live outside this crate and plug in through
//! [`crate::parser::SourceEventParser`]. The two bundled here keep the pipeline usable
//! on its own:
//!
//! - [`sketch`]: a small line-based wiki dialect
//! - [`recorded`]: replays raw event streams captured as JSON

pub mod recorded;
pub mod sketch;

pub use recorded::RecordedEventsParser;
pub use sketch::SketchParser;

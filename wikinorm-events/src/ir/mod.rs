//! Event vocabularies and the document tree.
//!
//! Two event vocabularies live here. [`raw`] is what grammar-specific parsers emit;
//! [`events`] is the canonical, syntax-independent stream the normalizer produces.
//! [`nodes`] is the nested form of the canonical stream.

pub mod events;
pub mod nodes;
pub mod parameters;
pub mod raw;

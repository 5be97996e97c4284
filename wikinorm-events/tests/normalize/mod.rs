//! End-to-end normalization tests
//!
//! Sketch source (or a recorded raw stream) in, normalized event listing out.

mod documents;
mod formats;
mod headers;
mod recorded;
mod references;

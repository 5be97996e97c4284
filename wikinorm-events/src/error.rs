//! Error types for normalization

use crate::common::flat_to_nested::ConversionError;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A source parser could not process its input.
///
/// There is no partial recovery: events already pushed downstream stay there,
/// the rest of the document is lost.
#[derive(Debug, Error)]
pub enum ParseFailure {
    /// The grammar rejected the input.
    #[error("{syntax} parser failed: {cause}")]
    Source {
        syntax: String,
        #[source]
        cause: BoxError,
    },
    /// The raw stream stopped with open document levels or an open header.
    #[error("event stream ended with {depth} unterminated container(s)")]
    Unterminated { depth: usize },
}

impl ParseFailure {
    pub fn grammar(syntax: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        ParseFailure::Source {
            syntax: syntax.into(),
            cause: cause.into(),
        }
    }

    pub fn unterminated(depth: usize) -> Self {
        ParseFailure::Unterminated { depth }
    }
}

/// Errors surfaced by the [`crate::Normalizer`] facade.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("syntax '{0}' not found")]
    SyntaxNotFound(String),
    #[error(transparent)]
    Parse(#[from] ParseFailure),
    #[error("could not build document tree: {0}")]
    Tree(#[from] ConversionError),
}

/// A line-addressed grammar error, reported by the bundled syntaxes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn source_failure_keeps_root_cause() {
        let failure = ParseFailure::grammar("sketch/1.0", SyntaxError::new(3, "unterminated link"));
        assert_eq!(
            failure.to_string(),
            "sketch/1.0 parser failed: line 3: unterminated link"
        );
        let cause = failure.source().map(ToString::to_string);
        assert_eq!(cause.as_deref(), Some("line 3: unterminated link"));
    }

    #[test]
    fn parse_failure_converts_into_normalize_error() {
        let error: NormalizeError = ParseFailure::unterminated(2).into();
        assert_eq!(
            error.to_string(),
            "event stream ended with 2 unterminated container(s)"
        );
    }
}

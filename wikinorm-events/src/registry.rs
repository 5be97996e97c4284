//! Parser registry for syntax discovery and selection
//!
//! This module provides a centralized registry for the available source parsers.
//! Parsers are registered and retrieved by their syntax id.

use crate::error::NormalizeError;
use crate::parser::SourceEventParser;
use crate::Normalizer;
use std::collections::HashMap;

/// Registry of source parsers
///
/// # Examples
///
/// ```ignore
/// let registry = ParserRegistry::with_defaults();
/// let events = registry.normalizer("sketch/1.0")?.normalize_to_events("= Title =")?;
/// ```
pub struct ParserRegistry {
    parsers: HashMap<String, Box<dyn SourceEventParser>>,
}

impl ParserRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ParserRegistry {
            parsers: HashMap::new(),
        }
    }

    /// Register a parser
    ///
    /// If a parser for the same syntax already exists, it will be replaced.
    pub fn register<P: SourceEventParser + 'static>(&mut self, parser: P) {
        self.parsers
            .insert(parser.syntax().to_string(), Box::new(parser));
    }

    /// Get a parser by syntax id
    pub fn get(&self, syntax: &str) -> Result<&dyn SourceEventParser, NormalizeError> {
        self.parsers
            .get(syntax)
            .map(|p| p.as_ref())
            .ok_or_else(|| NormalizeError::SyntaxNotFound(syntax.to_string()))
    }

    /// Check if a syntax is registered
    pub fn has(&self, syntax: &str) -> bool {
        self.parsers.contains_key(syntax)
    }

    /// List all registered syntax ids (sorted)
    pub fn list_syntaxes(&self) -> Vec<String> {
        let mut names: Vec<_> = self.parsers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Syntax ids with their descriptions, sorted by id
    pub fn describe(&self) -> Vec<(String, String)> {
        self.list_syntaxes()
            .into_iter()
            .map(|syntax| {
                let description = self.parsers[&syntax].description().to_string();
                (syntax, description)
            })
            .collect()
    }

    /// Detect the syntax from a file name based on its extension
    ///
    /// When several parsers claim the extension, the smallest syntax id wins.
    pub fn detect_syntax_from_filename(&self, filename: &str) -> Option<String> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?;

        self.list_syntaxes()
            .into_iter()
            .find(|syntax| self.parsers[syntax].file_extensions().contains(&extension))
    }

    /// A normalizer for `syntax`, without reference resolvers
    pub fn normalizer(&self, syntax: &str) -> Result<Normalizer<'_>, NormalizeError> {
        Ok(Normalizer::new(self.get(syntax)?))
    }

    /// Create a registry with the bundled syntaxes
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::syntaxes::SketchParser);
        registry.register(crate::syntaxes::RecordedEventsParser);

        registry
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

//! Shared configuration loader for the wikinorm toolchain.
//!
//! `defaults/wikinorm.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`WikinormConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use wikinorm_events::NormalizerOptions;

const DEFAULT_TOML: &str = include_str!("../defaults/wikinorm.default.toml");

/// Top-level configuration consumed by wikinorm applications.
#[derive(Debug, Clone, Deserialize)]
pub struct WikinormConfig {
    pub normalizer: NormalizerConfig,
    pub references: ReferencesConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Mirrors the knobs exposed by the event normalizer.
#[derive(Debug, Clone, Deserialize)]
pub struct NormalizerConfig {
    pub header_id_prefix: String,
    pub label_marker: String,
}

impl From<NormalizerConfig> for NormalizerOptions {
    fn from(config: NormalizerConfig) -> Self {
        NormalizerOptions {
            header_id_prefix: config.header_id_prefix,
            label_marker: config.label_marker,
        }
    }
}

impl From<&NormalizerConfig> for NormalizerOptions {
    fn from(config: &NormalizerConfig) -> Self {
        NormalizerOptions {
            header_id_prefix: config.header_id_prefix.clone(),
            label_marker: config.label_marker.clone(),
        }
    }
}

/// Which reference kinds get resolved.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferencesConfig {
    pub links: bool,
    pub images: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// How normalized documents are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One event per line.
    Events,
    /// The event stream as a JSON array.
    Json,
    /// The document tree as JSON.
    Tree,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 3] = ["events", "json", "tree"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "events" => Some(OutputFormat::Events),
            "json" => Some(OutputFormat::Json),
            "tree" => Some(OutputFormat::Tree),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Events => "events",
            OutputFormat::Json => "json",
            OutputFormat::Tree => "tree",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and validate the resulting configuration.
    pub fn build(self) -> Result<WikinormConfig, ConfigError> {
        let config: WikinormConfig = self.builder.build()?.try_deserialize()?;
        validate(&config)?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<WikinormConfig, ConfigError> {
    Loader::new().build()
}

// The normalizer panics on a bad prefix; reject it while it is still a user error.
fn validate(config: &WikinormConfig) -> Result<(), ConfigError> {
    let prefix = &config.normalizer.header_id_prefix;
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::Message(format!(
            "normalizer.header_id_prefix must be non-empty ASCII letters, got {prefix:?}"
        )));
    }
    let marker = &config.normalizer.label_marker;
    if marker.is_empty() || marker.chars().any(|c| !c.is_alphanumeric()) {
        return Err(ConfigError::Message(format!(
            "normalizer.label_marker must be a single word, got {marker:?}"
        )));
    }
    Ok(())
}

//! Link and image reference resolution.
//!
//! Grammars hand over references as raw strings (`Main.WebHome#Intro`,
//! `https://example.com`, `mailto:a@b.org`, `Space.Page@photo.png`). A
//! [`ReferenceResolver`] turns such a string into a structured
//! [`ResourceReference`]. Resolution is pure and total: anything that cannot be
//! understood comes back as an unresolved literal holding the raw text, so a
//! renderer always has something to display.

use crate::ir::parameters::Parameters;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Parameter holding the anchor part of a document reference.
pub const ANCHOR_PARAMETER: &str = "anchor";
/// Parameter holding the query string of a document reference.
pub const QUERY_STRING_PARAMETER: &str = "queryString";
/// Parameter holding the owning document of an attachment.
pub const DOCUMENT_PARAMETER: &str = "document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Link,
    Image,
}

/// What a resolved reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Url,
    Mailto,
    Document,
    Attachment,
    Unknown,
}

impl ResourceType {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceType::Url => "url",
            ResourceType::Mailto => "mailto",
            ResourceType::Document => "doc",
            ResourceType::Attachment => "attach",
            ResourceType::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Resolved,
    UnresolvedLiteral,
}

/// Structured form of a link or image target. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceReference {
    kind: ReferenceKind,
    resource: ResourceType,
    raw: String,
    target: String,
    parameters: Parameters,
    resolution: Resolution,
}

impl ResourceReference {
    pub fn resolved(
        kind: ReferenceKind,
        resource: ResourceType,
        raw: impl Into<String>,
        target: impl Into<String>,
        parameters: Parameters,
    ) -> Self {
        Self {
            kind,
            resource,
            raw: raw.into(),
            target: target.into(),
            parameters,
            resolution: Resolution::Resolved,
        }
    }

    /// A reference that could not be understood; the raw text is kept verbatim.
    pub fn unresolved(kind: ReferenceKind, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            kind,
            resource: ResourceType::Unknown,
            target: raw.clone(),
            raw,
            parameters: Parameters::new(),
            resolution: Resolution::UnresolvedLiteral,
        }
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    pub fn resource(&self) -> ResourceType {
        self.resource
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution == Resolution::Resolved
    }
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolution {
            Resolution::Resolved => write!(f, "{}:{}", self.resource.name(), self.target)?,
            Resolution::UnresolvedLiteral => write!(f, "unresolved:{}", self.raw)?,
        }
        if !self.parameters.is_empty() {
            write!(f, " {{{}}}", self.parameters)?;
        }
        Ok(())
    }
}

/// Turns raw reference strings into [`ResourceReference`]s.
///
/// Implementations must be pure: no I/O, no state carried between calls, and no
/// failure mode other than returning an unresolved literal.
pub trait ReferenceResolver: Send + Sync {
    fn resolve(&self, raw: &str) -> ResourceReference;
}

/// Returns the parsed URL when `raw` is an absolute URL with an authority
/// (`scheme://host...`). Opaque forms such as `Main:Page` do not qualify.
fn absolute_url(raw: &str) -> Option<Url> {
    if !raw.contains("://") {
        return None;
    }
    Url::parse(raw)
        .ok()
        .filter(|url| !url.cannot_be_a_base() && url.has_host())
}

/// Default resolver for links.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkResolver;

impl LinkResolver {
    fn document(raw: &str, reference: &str) -> ResourceReference {
        let mut parameters = Parameters::new();
        let mut rest = reference;

        if let Some((head, anchor)) = rest.split_once('#') {
            rest = head;
            if !anchor.is_empty() {
                parameters.insert(ANCHOR_PARAMETER, anchor);
            }
        }
        if let Some((head, query)) = rest.split_once('?') {
            rest = head;
            if !query.is_empty() {
                parameters.insert(QUERY_STRING_PARAMETER, query);
            }
        }

        // An empty name with an anchor targets the current document.
        if rest.is_empty() && parameters.is_empty() {
            return ResourceReference::unresolved(ReferenceKind::Link, raw);
        }
        if rest.chars().any(char::is_whitespace) {
            return ResourceReference::unresolved(ReferenceKind::Link, raw);
        }

        ResourceReference::resolved(
            ReferenceKind::Link,
            ResourceType::Document,
            raw,
            rest,
            parameters,
        )
    }
}

impl ReferenceResolver for LinkResolver {
    fn resolve(&self, raw: &str) -> ResourceReference {
        let reference = raw.trim();
        if reference.is_empty() {
            return ResourceReference::unresolved(ReferenceKind::Link, raw);
        }

        if let Some(address) = reference.strip_prefix("mailto:") {
            return match address.split_once('@') {
                Some((user, host)) if !user.is_empty() && !host.is_empty() => {
                    ResourceReference::resolved(
                        ReferenceKind::Link,
                        ResourceType::Mailto,
                        raw,
                        address,
                        Parameters::new(),
                    )
                }
                _ => ResourceReference::unresolved(ReferenceKind::Link, raw),
            };
        }

        if reference.contains("://") {
            return match absolute_url(reference) {
                Some(_) => ResourceReference::resolved(
                    ReferenceKind::Link,
                    ResourceType::Url,
                    raw,
                    reference,
                    Parameters::new(),
                ),
                None => ResourceReference::unresolved(ReferenceKind::Link, raw),
            };
        }

        if let Some(attachment) = reference.strip_prefix("attach:") {
            return attachment_reference(ReferenceKind::Link, raw, attachment);
        }

        Self::document(raw, reference)
    }
}

/// Default resolver for images.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageResolver;

impl ReferenceResolver for ImageResolver {
    fn resolve(&self, raw: &str) -> ResourceReference {
        let reference = raw.trim();
        if reference.is_empty() {
            return ResourceReference::unresolved(ReferenceKind::Image, raw);
        }

        if reference.contains("://") {
            return match absolute_url(reference) {
                Some(_) => ResourceReference::resolved(
                    ReferenceKind::Image,
                    ResourceType::Url,
                    raw,
                    reference,
                    Parameters::new(),
                ),
                None => ResourceReference::unresolved(ReferenceKind::Image, raw),
            };
        }

        let reference = reference.strip_prefix("attach:").unwrap_or(reference);
        attachment_reference(ReferenceKind::Image, raw, reference)
    }
}

/// `Space.Page@file.png` or a bare `file.png` (attached to the current document).
fn attachment_reference(kind: ReferenceKind, raw: &str, reference: &str) -> ResourceReference {
    let (document, file) = match reference.rsplit_once('@') {
        Some((document, file)) => (Some(document), file),
        None => (None, reference),
    };

    if file.is_empty() || file.chars().any(char::is_whitespace) {
        return ResourceReference::unresolved(kind, raw);
    }

    let mut parameters = Parameters::new();
    match document {
        Some("") => return ResourceReference::unresolved(kind, raw),
        Some(document) => parameters.insert(DOCUMENT_PARAMETER, document),
        None => {}
    }

    ResourceReference::resolved(kind, ResourceType::Attachment, raw, file, parameters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_standing_url_resolves_to_url() {
        let reference = LinkResolver.resolve("http://example.com");
        assert_eq!(reference.resource(), ResourceType::Url);
        assert_eq!(reference.target(), "http://example.com");
        assert!(reference.parameters().is_empty());
        assert!(reference.is_resolved());
    }

    #[test]
    fn document_reference_splits_anchor_and_query() {
        let reference = LinkResolver.resolve("Main.WebHome?xpage=plain#Intro");
        assert_eq!(reference.resource(), ResourceType::Document);
        assert_eq!(reference.target(), "Main.WebHome");
        assert_eq!(reference.parameters().get(ANCHOR_PARAMETER), Some("Intro"));
        assert_eq!(
            reference.parameters().get(QUERY_STRING_PARAMETER),
            Some("xpage=plain")
        );
    }

    #[test]
    fn anchor_only_targets_current_document() {
        let reference = LinkResolver.resolve("#Notes");
        assert!(reference.is_resolved());
        assert_eq!(reference.target(), "");
        assert_eq!(reference.parameters().get(ANCHOR_PARAMETER), Some("Notes"));
    }

    #[test]
    fn mailto_keeps_address() {
        let reference = LinkResolver.resolve("mailto:john@example.org");
        assert_eq!(reference.resource(), ResourceType::Mailto);
        assert_eq!(reference.target(), "john@example.org");
    }

    #[test]
    fn malformed_input_becomes_unresolved_literal() {
        for raw in ["", "   ", "mailto:nobody", "http://", "two words", "#"] {
            let reference = LinkResolver.resolve(raw);
            assert_eq!(reference.resolution(), Resolution::UnresolvedLiteral, "{raw:?}");
            assert_eq!(reference.raw(), raw);
            assert_eq!(reference.kind(), ReferenceKind::Link);
        }
    }

    #[test]
    fn image_attachment_names_its_document() {
        let reference = ImageResolver.resolve("Space.Page@photo.png");
        assert_eq!(reference.kind(), ReferenceKind::Image);
        assert_eq!(reference.resource(), ResourceType::Attachment);
        assert_eq!(reference.target(), "photo.png");
        assert_eq!(
            reference.parameters().get(DOCUMENT_PARAMETER),
            Some("Space.Page")
        );

        let bare = ImageResolver.resolve("logo.svg");
        assert_eq!(bare.target(), "logo.svg");
        assert!(bare.parameters().is_empty());
    }

    #[test]
    fn image_url_and_blank_input() {
        assert_eq!(
            ImageResolver.resolve("https://example.com/a.png").resource(),
            ResourceType::Url
        );
        assert!(!ImageResolver.resolve("").is_resolved());
        assert!(!ImageResolver.resolve("@photo.png").is_resolved());
    }

    #[test]
    fn display_names_type_and_target() {
        assert_eq!(
            LinkResolver.resolve("Main.Home#Top").to_string(),
            "doc:Main.Home {anchor=\"Top\"}"
        );
        assert_eq!(LinkResolver.resolve("a b").to_string(), "unresolved:a b");
    }
}

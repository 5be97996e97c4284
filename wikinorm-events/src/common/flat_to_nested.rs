//! Converts a flat event stream into a nested document tree.
//!
//! # The High-Level Concept
//!
//! The core challenge is to reconstruct a tree structure from a linear sequence of events.
//! The algorithm uses a stack to keep track of the current nesting level. The stack acts as
//! a memory of "open" containers. When we encounter a `Start` event for a container (like a
//! header or list), we push it onto the stack, making it the new "current" container. When
//! we see its corresponding `End` event, we pop it off, returning to the parent container.
//!
//! The normalized stream is fully bracketed, so unlike parsers for flat formats no
//! container is ever closed implicitly: every mismatch is an error.
//!
//! # The Algorithm
//!
//! 1. **`StartDocument`:** creates the root and pushes it. Only one is allowed.
//!
//! 2. **Other `Start` events:**
//!    - Create an empty [`Container`] for that element
//!    - Push it onto the stack as the new current container
//!
//! 3. **Leaf events:**
//!    - Add the leaf to the current container (top of stack)
//!    - Do NOT modify the stack
//!
//! 4. **`End` events:**
//!    - Pop the node off the stack
//!    - Validate that the popped node matches the End event, payload included
//!    - Add it to its parent, or complete the document when the root is popped
//!
//! 5. **Completion:**
//!    - The stack must be empty and the root complete
//!
//! [`TreeBuilder`] runs the algorithm as a [`Listener`], so the normalizer can feed it
//! directly. Errors are latched: after the first one, further events are ignored and
//! [`TreeBuilder::finish`] reports it.

use crate::ir::events::Event;
use crate::ir::nodes::{Container, ContainerKind, DocNode, Document, Leaf};
use crate::listener::Listener;

/// Error type for flat-to-nested conversion
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// Stack was empty when trying to pop
    UnexpectedEnd(String),
    /// Mismatched start/end events
    MismatchedEvents { expected: String, found: String },
    /// Content outside of any document
    UnexpectedInline(String),
    /// Events remaining after document end
    ExtraEvents,
    /// Stack not empty at end (unclosed containers)
    UnclosedContainers(usize),
}

impl std::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionError::UnexpectedEnd(msg) => write!(f, "Unexpected end event: {msg}"),
            ConversionError::MismatchedEvents { expected, found } => {
                write!(f, "Mismatched events: expected {expected}, found {found}")
            }
            ConversionError::UnexpectedInline(msg) => {
                write!(f, "Unexpected content: {msg}")
            }
            ConversionError::ExtraEvents => write!(f, "Extra events after document end"),
            ConversionError::UnclosedContainers(count) => {
                write!(f, "Unclosed containers: {count} nodes remain on stack")
            }
        }
    }
}

impl std::error::Error for ConversionError {}

/// Represents a node being built on the stack
#[derive(Debug)]
enum StackNode {
    Document(Document),
    Container(Container),
}

impl StackNode {
    fn add_child(&mut self, child: DocNode) {
        match self {
            StackNode::Document(doc) => doc.children.push(child),
            StackNode::Container(container) => container.children.push(child),
        }
    }

    /// Get the node type name for error messages
    fn type_name(&self) -> &'static str {
        match self {
            StackNode::Document(_) => "Document",
            StackNode::Container(container) => container.kind.name(),
        }
    }
}

/// Builds a [`Document`] from events pushed one at a time.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    stack: Vec<StackNode>,
    root: Option<Document>,
    error: Option<ConversionError>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the completed document, or the first error encountered.
    pub fn finish(self) -> Result<Document, ConversionError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.stack.is_empty() {
            return Err(ConversionError::UnclosedContainers(self.stack.len()));
        }
        self.root.ok_or_else(|| {
            ConversionError::UnexpectedEnd("event stream contained no document".to_string())
        })
    }

    fn process(&mut self, event: Event) -> Result<(), ConversionError> {
        if self.root.is_some() {
            return Err(ConversionError::ExtraEvents);
        }

        if let Event::StartDocument(metadata) = event {
            if let Some(open) = self.stack.last() {
                return Err(ConversionError::MismatchedEvents {
                    expected: format!("content of {}", open.type_name()),
                    found: "StartDocument".to_string(),
                });
            }
            self.stack.push(StackNode::Document(Document {
                metadata,
                children: Vec::new(),
            }));
            return Ok(());
        }

        if self.stack.is_empty() {
            return Err(if event.is_end() {
                ConversionError::UnexpectedEnd(format!("{event} with empty stack"))
            } else {
                ConversionError::UnexpectedInline(format!("{event} outside of a document"))
            });
        }

        if let Some(kind) = ContainerKind::from_start(&event) {
            self.stack.push(StackNode::Container(Container::new(kind)));
            return Ok(());
        }

        if event.is_end() {
            return self.close(event);
        }

        let leaf = Leaf::from_event(&event).ok_or_else(|| {
            ConversionError::UnexpectedInline(format!("{event} is not a leaf event"))
        })?;
        if let Some(parent) = self.stack.last_mut() {
            parent.add_child(DocNode::Leaf(leaf));
        }
        Ok(())
    }

    fn close(&mut self, event: Event) -> Result<(), ConversionError> {
        let node = self
            .stack
            .pop()
            .ok_or_else(|| ConversionError::UnexpectedEnd(format!("{event} with empty stack")))?;

        match node {
            StackNode::Document(document) => {
                if !matches!(event, Event::EndDocument(_)) {
                    return Err(ConversionError::MismatchedEvents {
                        expected: "EndDocument".to_string(),
                        found: event.to_string(),
                    });
                }
                self.root = Some(document);
                Ok(())
            }
            StackNode::Container(container) => {
                let expected = container.kind.end_event();
                if expected != event {
                    return Err(ConversionError::MismatchedEvents {
                        expected: expected.to_string(),
                        found: event.to_string(),
                    });
                }
                let parent = self.stack.last_mut().ok_or_else(|| {
                    ConversionError::UnexpectedEnd(format!("No parent for {}", container.kind.name()))
                })?;
                parent.add_child(DocNode::Container(container));
                Ok(())
            }
        }
    }
}

impl Listener for TreeBuilder {
    fn on_event(&mut self, event: Event) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = self.process(event) {
            self.error = Some(error);
        }
    }
}

/// Converts a flat event stream into a document tree.
pub fn events_to_tree(events: &[Event]) -> Result<Document, ConversionError> {
    let mut builder = TreeBuilder::new();
    for event in events {
        builder.process(event.clone())?;
    }
    builder.finish()
}

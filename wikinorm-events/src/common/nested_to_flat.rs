//! Converts a nested document tree into a flat event stream.
//!
//! # The High-Level Concept
//!
//! Traversing the nested document structure in pre-order lets us emit a
//! sequence of start/content/end events that can later be reassembled into
//! the original tree. Each container node produces its own start/end markers
//! and then recurses into children so the flat stream preserves the original
//! nesting.
//!
//! # The Algorithm
//!
//! 1. **Entering Containers:** emit the container's `Start*` event, then recurse
//!    into its children
//! 2. **Leaves:** emit the leaf's event in place
//! 3. **Exiting Containers:** emit the matching `End*` event once children are
//!    processed
//!
//! This mirrors the reverse process performed in `flat_to_nested`, ensuring
//! round-trippable conversions between the tree and the flat event stream.

use crate::ir::events::Event;
use crate::ir::nodes::{DocNode, Document};
use crate::listener::Listener;

/// Converts a document tree to a flat vector of `Event`s.
pub fn tree_to_events(document: &Document) -> Vec<Event> {
    let mut events = Vec::new();
    walk(document, &mut events);
    events
}

/// Replays a document tree into `listener`.
pub fn walk(document: &Document, listener: &mut dyn Listener) {
    listener.on_event(Event::StartDocument(document.metadata.clone()));
    for child in &document.children {
        walk_node(child, listener);
    }
    listener.on_event(Event::EndDocument(document.metadata.clone()));
}

fn walk_node(node: &DocNode, listener: &mut dyn Listener) {
    match node {
        DocNode::Container(container) => {
            listener.on_event(container.kind.start_event());
            for child in &container.children {
                walk_node(child, listener);
            }
            listener.on_event(container.kind.end_event());
        }
        DocNode::Leaf(leaf) => listener.on_event(leaf.to_event()),
    }
}

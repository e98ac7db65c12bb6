//! Message tree walking
//!
//! A record's `mapping` is a graph of message nodes keyed by message id.
//! [`MessageWalker`] flattens it into one [`MessageEntry`] per node that
//! carries a message, in the mapping's document order. Parent/child links are
//! not followed, so branched conversations come out in file order rather than
//! thread order.
//!
//! Document order is only available because `serde_json` is built with
//! `preserve_order`; with the default `BTreeMap` backing the walk would be
//! sorted by message id instead.

use serde_json::{map, Value};

use crate::types::Record;

/// Role reported when a message has no usable `author.role`.
pub const UNKNOWN_ROLE: &str = "unknown";

/// One message extracted from the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry<'a> {
    /// Key of the node in the mapping
    pub id: &'a str,
    /// `author.role` ("user", "assistant", "system", "tool", ...)
    pub role: &'a str,
    /// `content.content_type`, if the content object has one
    pub content_type: Option<&'a str>,
    /// String-typed content parts, in order. Non-text parts are skipped.
    pub parts: Vec<&'a str>,
}

impl<'a> MessageEntry<'a> {
    /// Total characters across text parts.
    pub fn text_len(&self) -> usize {
        self.parts.iter().map(|p| p.chars().count()).sum()
    }

    /// Whether the message carries a content type or any text.
    pub fn has_content(&self) -> bool {
        self.content_type.is_some() || !self.parts.is_empty()
    }
}

/// Lazy iterator over the messages of one record.
///
/// Cheap to create; walking the same record twice yields the same sequence.
pub struct MessageWalker<'a> {
    nodes: Option<map::Iter<'a>>,
}

impl<'a> MessageWalker<'a> {
    pub fn new(record: Record<'a>) -> Self {
        Self {
            nodes: record.mapping().map(|m| m.iter()),
        }
    }
}

impl<'a> Iterator for MessageWalker<'a> {
    type Item = MessageEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes.as_mut()?;
        for (id, node) in nodes.by_ref() {
            if let Some(entry) = entry_from_node(id, node) {
                return Some(entry);
            }
        }
        None
    }
}

/// Walk the messages of `record`.
pub fn walk(record: Record<'_>) -> MessageWalker<'_> {
    MessageWalker::new(record)
}

fn entry_from_node<'a>(id: &'a str, node: &'a Value) -> Option<MessageEntry<'a>> {
    // Structural nodes (root, edges) have no message or an empty one
    let message = node
        .get("message")
        .and_then(Value::as_object)
        .filter(|m| !m.is_empty())?;

    let role = message
        .get("author")
        .and_then(|a| a.get("role"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_ROLE);

    let content = message.get("content").and_then(Value::as_object);
    let content_type = content
        .and_then(|c| c.get("content_type"))
        .and_then(Value::as_str);
    let parts = content
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| parts.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    Some(MessageEntry {
        id,
        role,
        content_type,
        parts,
    })
}

//! Conversion between document trees and dotted-key flat maps.
//!
//! Maps are walked recursively, joining segment names with `.`. Null,
//! scalar and sequence nodes are leaves; sequences are stored as a single
//! flow-style string rather than being split per element.

use super::document::Node;
use std::collections::BTreeMap;
use tracing::warn;

/// Path separator for dotted keys.
pub const SEPARATOR: char = '.';

/// Flatten `node` found at `prefix` into `items`, overwriting existing keys.
pub fn flatten_into(items: &mut BTreeMap<String, String>, prefix: &str, node: &Node) {
    match node {
        Node::Null => {
            items.insert(prefix.to_string(), String::new());
        }
        Node::Scalar(text) => {
            items.insert(prefix.to_string(), text.clone());
        }
        Node::Sequence(_) => {
            items.insert(prefix.to_string(), node.to_flow());
        }
        Node::Map(entries) => {
            for (key, child) in entries {
                flatten_into(items, &join(prefix, key), child);
            }
        }
    }
}

/// Flatten a whole tree into a fresh map.
pub fn flatten(node: &Node) -> BTreeMap<String, String> {
    let mut items = BTreeMap::new();
    flatten_into(&mut items, "", node);
    items
}

/// Rebuild a map-rooted tree from flat entries.
///
/// Empty values come back as `Null`. A key that is both a leaf and the root
/// of deeper keys (possible after overlaying sources) keeps the subtree.
pub fn unflatten<'a, I>(items: I) -> Node
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut root = BTreeMap::new();
    let mut root_leaf = None;

    for (key, value) in items {
        if key.is_empty() {
            root_leaf = Some(leaf(value));
            continue;
        }
        insert_path(&mut root, key, leaf(value));
    }

    match root_leaf {
        Some(node) if root.is_empty() => node,
        Some(_) => {
            warn!("Dropping root value shadowed by nested keys");
            Node::Map(root)
        }
        None => Node::Map(root),
    }
}

fn leaf(value: &str) -> Node {
    if value.is_empty() {
        Node::Null
    } else {
        Node::Scalar(value.to_string())
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{SEPARATOR}{key}")
    }
}

fn insert_path(root: &mut BTreeMap<String, Node>, key: &str, value: Node) {
    let mut segments = key.split(SEPARATOR).peekable();
    let mut level = root;

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            if matches!(level.get(segment), Some(Node::Map(_))) {
                warn!(key = %key, "Dropping value shadowed by nested keys");
            } else {
                level.insert(segment.to_string(), value);
            }
            return;
        }

        let child = level
            .entry(segment.to_string())
            .or_insert_with(|| Node::Map(BTreeMap::new()));
        if child.is_leaf() {
            warn!(key = %key, segment = %segment, "Replacing leaf value with nested keys");
            *child = Node::Map(BTreeMap::new());
        }
        let Node::Map(next) = child else {
            unreachable!("child was just made a map");
        };
        level = next;
    }
}

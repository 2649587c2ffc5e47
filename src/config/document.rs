//! Structured documents consumed and produced by the store.
//!
//! YAML input is read from the parser's event stream so scalars keep the
//! exact text of the document (`1.10`, `0x1F`, `FALSE` and long integer ids are
//! stored as written). JSON input goes through `serde_json::Value`, whose
//! numbers keep their source text. Output is produced with `serde_yaml` and
//! `serde_json`.

use crate::error::{ConfigError, ConfigResult};
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use yaml_rust2::parser::{Event, EventReceiver, Parser};
use yaml_rust2::scanner::TScalarStyle;

/// A node of a structured configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Null,
    Scalar(String),
    Sequence(Vec<Node>),
    Map(BTreeMap<String, Node>),
}

/// Text format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick a format from a file extension. Anything but `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Yaml => write!(f, "yaml"),
            DocumentFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse text into its documents.
///
/// YAML input may hold several `---` separated documents; JSON input is
/// always a single document.
pub fn parse(text: &str, format: DocumentFormat) -> ConfigResult<Vec<Node>> {
    match format {
        DocumentFormat::Yaml => {
            let mut builder = TreeBuilder::default();
            Parser::new_from_str(text).load(&mut builder, true)?;
            builder.finish()
        }
        DocumentFormat::Json => {
            let value: JsonValue = serde_json::from_str(text)?;
            Ok(vec![Node::from(value)])
        }
    }
}

/// Serialize a tree as a YAML document.
pub fn to_yaml_string(node: &Node) -> ConfigResult<String> {
    Ok(serde_yaml::to_string(&node.to_yaml())?)
}

/// Serialize a tree as pretty-printed JSON.
pub fn to_json_string(node: &Node) -> ConfigResult<String> {
    Ok(serde_json::to_string_pretty(&node.to_json())?)
}

impl Node {
    /// Null, Scalar and Sequence nodes are leaves; only maps have children.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Node::Map(_))
    }

    /// Render the node as compact flow-style YAML, e.g. `[a, b, {k: v}]`.
    pub fn to_flow(&self) -> String {
        let mut out = String::new();
        self.write_flow(&mut out);
        out
    }

    fn write_flow(&self, out: &mut String) {
        match self {
            Node::Null => out.push('~'),
            Node::Scalar(text) => out.push_str(&flow_scalar(text)),
            Node::Sequence(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_flow(out);
                }
                out.push(']');
            }
            Node::Map(entries) => {
                out.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&flow_scalar(key));
                    out.push_str(": ");
                    value.write_flow(out);
                }
                out.push('}');
            }
        }
    }

    /// Convert into a YAML value for serialization.
    pub fn to_yaml(&self) -> YamlValue {
        match self {
            Node::Null => YamlValue::Null,
            Node::Scalar(text) => scalar_to_yaml(text),
            Node::Sequence(items) => YamlValue::Sequence(items.iter().map(Node::to_yaml).collect()),
            Node::Map(entries) => {
                let mut mapping = serde_yaml::Mapping::new();
                for (key, value) in entries {
                    mapping.insert(YamlValue::String(key.clone()), value.to_yaml());
                }
                YamlValue::Mapping(mapping)
            }
        }
    }

    /// Convert into a JSON value for serialization.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Node::Null => JsonValue::Null,
            Node::Scalar(text) => scalar_to_json(text),
            Node::Sequence(items) => JsonValue::Array(items.iter().map(Node::to_json).collect()),
            Node::Map(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Folds parser events into one [`Node`] per document.
#[derive(Default)]
struct TreeBuilder {
    documents: Vec<Node>,
    root: Option<Node>,
    stack: Vec<(Frame, usize)>,
    anchors: HashMap<usize, Node>,
    error: Option<ConfigError>,
}

enum Frame {
    Sequence(Vec<Node>),
    Map(BTreeMap<String, Node>, Option<String>),
}

impl TreeBuilder {
    fn finish(self) -> ConfigResult<Vec<Node>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.documents),
        }
    }

    fn handle(&mut self, event: Event) -> ConfigResult<()> {
        match event {
            Event::Scalar(text, style, anchor, tag) => {
                if let Some(tag) = &tag {
                    check_tag(&tag.handle, &tag.suffix)?;
                }
                let node = if tag.is_none() && matches!(style, TScalarStyle::Plain) && is_null(&text) {
                    Node::Null
                } else {
                    Node::Scalar(text)
                };
                self.complete(node, anchor)
            }
            Event::SequenceStart(anchor, tag) => {
                if let Some(tag) = &tag {
                    check_tag(&tag.handle, &tag.suffix)?;
                }
                self.stack.push((Frame::Sequence(Vec::new()), anchor));
                Ok(())
            }
            Event::MappingStart(anchor, tag) => {
                if let Some(tag) = &tag {
                    check_tag(&tag.handle, &tag.suffix)?;
                }
                self.stack.push((Frame::Map(BTreeMap::new(), None), anchor));
                Ok(())
            }
            Event::SequenceEnd | Event::MappingEnd => match self.stack.pop() {
                Some((Frame::Sequence(items), anchor)) => self.complete(Node::Sequence(items), anchor),
                Some((Frame::Map(entries, None), anchor)) => self.complete(Node::Map(entries), anchor),
                Some((Frame::Map(_, Some(key)), _)) => {
                    Err(ConfigError::malformed(format!("map key {key} has no value")))
                }
                None => Err(ConfigError::malformed("unbalanced collection end")),
            },
            Event::Alias(anchor) => match self.anchors.get(&anchor) {
                Some(node) => self.complete(node.clone(), 0),
                None => Err(ConfigError::malformed(format!("unknown alias {anchor}"))),
            },
            Event::DocumentEnd => {
                let root = self.root.take().unwrap_or(Node::Null);
                self.documents.push(root);
                self.anchors.clear();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Attach a finished node to its parent, or make it the document root.
    fn complete(&mut self, node: Node, anchor: usize) -> ConfigResult<()> {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some((Frame::Sequence(items), _)) => items.push(node),
            Some((Frame::Map(entries, pending), _)) => match pending.take() {
                None => *pending = Some(map_key(node)?),
                Some(key) => {
                    if entries.contains_key(&key) {
                        return Err(ConfigError::malformed(format!("duplicate map key {key}")));
                    }
                    entries.insert(key, node);
                }
            },
        }
        Ok(())
    }
}

impl EventReceiver for TreeBuilder {
    fn on_event(&mut self, event: Event) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.handle(event) {
            self.error = Some(err);
        }
    }
}

/// Map keys become path segments, so they must be non-empty scalars.
fn map_key(node: Node) -> ConfigResult<String> {
    match node {
        Node::Scalar(key) if !key.is_empty() => Ok(key),
        Node::Scalar(_) | Node::Null => Err(ConfigError::malformed("null or empty map key")),
        other => Err(ConfigError::malformed(format!(
            "unsupported map key {}",
            other.to_flow()
        ))),
    }
}

/// Only the YAML core schema tags (`!!str`, `!!int`, ...) are accepted.
fn check_tag(handle: &str, suffix: &str) -> ConfigResult<()> {
    if handle == "!!" || handle == "tag:yaml.org,2002:" {
        Ok(())
    } else {
        Err(ConfigError::malformed(format!(
            "unsupported tagged value {handle}{suffix}"
        )))
    }
}

fn is_null(text: &str) -> bool {
    matches!(text, "" | "~" | "null" | "Null" | "NULL")
}

impl From<JsonValue> for Node {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Node::Null,
            JsonValue::Bool(b) => Node::Scalar(b.to_string()),
            JsonValue::Number(n) => Node::Scalar(n.to_string()),
            JsonValue::String(s) => Node::Scalar(s),
            JsonValue::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            JsonValue::Object(entries) => Node::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
        }
    }
}

fn flow_scalar(text: &str) -> Cow<'_, str> {
    let needs_quotes = text.is_empty()
        || text.trim() != text
        || matches!(text, "~" | "-" | "null" | "Null" | "NULL")
        || text.starts_with("- ")
        || text.starts_with(['?', '!', '&', '*', '|', '>', '\'', '"', '%', '@', '`', '#'])
        || text.contains([',', '[', ']', '{', '}', ':', '#', '\n']);
    if needs_quotes {
        // JSON string syntax is valid double-quoted YAML.
        Cow::Owned(JsonValue::String(text.to_string()).to_string())
    } else {
        Cow::Borrowed(text)
    }
}

fn scalar_to_yaml(text: &str) -> YamlValue {
    match text {
        "true" => YamlValue::Bool(true),
        "false" => YamlValue::Bool(false),
        _ => {
            if let Ok(n) = text.parse::<i64>()
                && n.to_string() == text
            {
                return YamlValue::Number(n.into());
            }
            if let Ok(f) = text.parse::<f64>()
                && f.is_finite()
                && f.to_string() == text
            {
                return YamlValue::Number(f.into());
            }
            YamlValue::String(text.to_string())
        }
    }
}

fn scalar_to_json(text: &str) -> JsonValue {
    match text {
        "true" => JsonValue::Bool(true),
        "false" => JsonValue::Bool(false),
        _ => {
            if let Ok(n) = text.parse::<i64>()
                && n.to_string() == text
            {
                return JsonValue::Number(n.into());
            }
            if let Ok(f) = text.parse::<f64>()
                && f.to_string() == text
                && let Some(n) = serde_json::Number::from_f64(f)
            {
                return JsonValue::Number(n);
            }
            JsonValue::String(text.to_string())
        }
    }
}

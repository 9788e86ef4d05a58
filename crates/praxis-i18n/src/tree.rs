//! Content trees: the in-memory shape of one locale's strings.
//!
//! A tree maps keys to text, nested trees, ordered lists, or stray scalars
//! (numbers, booleans, `null`). Scalars are kept rather than rejected so the
//! differ can report them as type errors instead of aborting a load.
//!
//! # Invariants
//!
//! 1. **Acyclic**: trees own their children, so a cycle cannot be built.
//!    Depth is still bounded by [`MAX_TREE_DEPTH`] when loading.
//! 2. **Addressable keys**: every key loaded from JSON is non-empty and free
//!    of `.`, so each node has exactly one dotted path.
//! 3. **Deterministic iteration**: entries are kept sorted by key.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::{I18nError, Result};

/// Deepest nesting accepted when loading a tree.
pub const MAX_TREE_DEPTH: usize = 64;

/// Separator between segments of a dotted key path.
pub const PATH_SEPARATOR: char = '.';

/// A single value stored in a [`ContentTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    /// Display text.
    Text(String),
    /// A nested section.
    Tree(ContentTree),
    /// Ordered list content such as bullet items.
    List(Vec<ContentNode>),
    /// Any other JSON scalar. Never valid display content.
    Scalar(Value),
}

impl ContentNode {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_tree(&self) -> Option<&ContentTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[ContentNode]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// JSON type name, used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Tree(_) => "object",
            Self::List(_) => "array",
            Self::Scalar(value) => value_type_name(value),
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Tree(tree) => tree.to_value(),
            Self::List(items) => Value::Array(items.iter().map(Self::to_value).collect()),
            Self::Scalar(value) => value.clone(),
        }
    }

    /// Text as-is; anything else as compact JSON.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            other => other.to_value().to_string(),
        }
    }
}

impl From<&str> for ContentNode {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ContentNode {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<ContentTree> for ContentNode {
    fn from(value: ContentTree) -> Self {
        Self::Tree(value)
    }
}

/// Keyed content for one locale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentTree {
    entries: BTreeMap<String, ContentNode>,
}

impl ContentTree {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Builder-style insert, mainly for hand-authored trees and tests.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, node: impl Into<ContentNode>) -> Self {
        self.entries.insert(key.into(), node.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<ContentNode>) {
        self.entries.insert(key.into(), node.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ContentNode> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentNode)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse and shape-check a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(source)?;
        Self::from_json_value(value)
    }

    /// Shape-check an already parsed JSON value.
    ///
    /// The root must be an object. Keys must be non-empty and must not
    /// contain the path separator. Nesting past [`MAX_TREE_DEPTH`] is a
    /// structural error.
    pub fn from_json_value(value: Value) -> Result<Self> {
        let map = root_object(value)?;
        Loader::strict().tree(map, "", 1)
    }

    /// Parse a locale under test.
    ///
    /// Only a document that is not JSON or whose root is not an object
    /// fails. Unaddressable entries (empty or dotted keys, subtrees nested
    /// past [`MAX_TREE_DEPTH`]) are dropped from the tree and returned as
    /// [`SkippedKey`]s.
    pub fn from_json_str_lenient(source: &str) -> Result<(Self, Vec<SkippedKey>)> {
        let value: Value = serde_json::from_str(source)?;
        Self::from_json_value_lenient(value)
    }

    pub fn from_json_value_lenient(value: Value) -> Result<(Self, Vec<SkippedKey>)> {
        let map = root_object(value)?;
        let mut loader = Loader::lenient();
        let tree = loader.tree(map, "", 1)?;
        Ok((tree, loader.skipped))
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, node)| (key.clone(), node.to_value()))
                .collect::<Map<String, Value>>(),
        )
    }

    /// SHA-256 over the canonical (sorted, compact) JSON form.
    #[must_use]
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_value().to_string().as_bytes());
        hex_encode(hasher.finalize().as_slice())
    }

    /// Every leaf path in sorted order. Lists and scalars count as leaves;
    /// empty subtrees contribute nothing.
    #[must_use]
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_leaf_paths(self, "", &mut out);
        out
    }
}

impl Serialize for ContentTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContentTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json_value(value).map_err(D::Error::custom)
    }
}

impl fmt::Display for ContentTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// An entry dropped by a lenient load, with the reason it is unaddressable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedKey {
    pub path: String,
    pub reason: String,
}

impl SkippedKey {
    fn from_error(error: &I18nError) -> Self {
        match error {
            I18nError::Structural { path, depth } => Self {
                path: path.clone(),
                reason: format!("nesting exceeds depth {depth}"),
            },
            I18nError::InvalidContent { path, reason } => Self {
                path: path.clone(),
                reason: reason.clone(),
            },
            other => Self {
                path: "<root>".to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Join a prefix and a key into a dotted path.
#[must_use]
pub fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{PATH_SEPARATOR}{key}")
    }
}

fn root_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(I18nError::invalid(
            "<root>",
            format!(
                "expected an object at the root, found {}",
                value_type_name(&other)
            ),
        )),
    }
}

/// Walks parsed JSON into a [`ContentTree`]. A strict loader stops at the
/// first bad entry; a lenient one drops it and records why.
struct Loader {
    lenient: bool,
    skipped: Vec<SkippedKey>,
}

impl Loader {
    fn strict() -> Self {
        Self {
            lenient: false,
            skipped: Vec::new(),
        }
    }

    fn lenient() -> Self {
        Self {
            lenient: true,
            skipped: Vec::new(),
        }
    }

    fn reject(&mut self, error: I18nError) -> Result<()> {
        if !self.lenient {
            return Err(error);
        }
        let skipped = SkippedKey::from_error(&error);
        tracing::warn!(path = %skipped.path, reason = %skipped.reason, "skipping unaddressable key");
        self.skipped.push(skipped);
        Ok(())
    }

    fn tree(&mut self, map: Map<String, Value>, path: &str, depth: usize) -> Result<ContentTree> {
        if depth > MAX_TREE_DEPTH {
            return Err(I18nError::Structural {
                path: display_path(path),
                depth: MAX_TREE_DEPTH,
            });
        }

        let mut tree = ContentTree::new();
        for (key, value) in map {
            let child_path = join_path(path, &key);
            if key.is_empty() {
                self.reject(I18nError::invalid(display_path(path), "empty key"))?;
                continue;
            }
            if key.contains(PATH_SEPARATOR) {
                self.reject(I18nError::invalid(
                    child_path,
                    "key contains the path separator '.'",
                ))?;
                continue;
            }
            match self.node(value, &child_path, depth + 1) {
                Ok(node) => {
                    tree.entries.insert(key, node);
                }
                Err(error @ I18nError::Structural { .. }) => self.reject(error)?,
                Err(error) => return Err(error),
            }
        }
        Ok(tree)
    }

    fn node(&mut self, value: Value, path: &str, depth: usize) -> Result<ContentNode> {
        match value {
            Value::String(text) => Ok(ContentNode::Text(text)),
            Value::Object(map) => self.tree(map, path, depth).map(ContentNode::Tree),
            Value::Array(items) => {
                if depth > MAX_TREE_DEPTH {
                    return Err(I18nError::Structural {
                        path: path.to_string(),
                        depth: MAX_TREE_DEPTH,
                    });
                }
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| self.node(item, &format!("{path}[{index}]"), depth + 1))
                    .collect::<Result<Vec<_>>>()
                    .map(ContentNode::List)
            }
            scalar => Ok(ContentNode::Scalar(scalar)),
        }
    }
}

fn collect_leaf_paths(tree: &ContentTree, prefix: &str, out: &mut Vec<String>) {
    for (key, node) in tree.iter() {
        let path = join_path(prefix, key);
        match node {
            ContentNode::Tree(child) => collect_leaf_paths(child, &path, out),
            _ => out.push(path),
        }
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

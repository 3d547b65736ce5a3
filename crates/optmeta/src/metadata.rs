//! Metadata nodes: declarative parse rules for one position in a value tree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Describes how to parse one position in a raw option tree.
///
/// A node can request scalar coercion after template resolution
/// (`type`), describe nested positions (`content`), and ask for map
/// keys themselves to be template-resolved (`keys`). All fields are
/// optional; the empty node means "resolve templates, change nothing
/// else".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataNode {
    /// Scalar coercion applied after template resolution: `"number"`
    /// or `"boolean"`. Any other name is a fatal parse error.
    ///
    /// Kept as the authored string so an unrecognized name can be
    /// reported verbatim at parse time.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub coerce: Option<String>,

    /// Parse rules for nested positions: a single node applied to every
    /// sequence element, or a per-key table for map values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MetadataContent>,

    /// When true, map keys are themselves template-resolved (with no
    /// metadata, so no coercion) before being used as output keys.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub keys: bool,
}

/// The nested-content position of a metadata node.
///
/// Untagged: a map whose keys are all metadata fields deserializes as a
/// single [`Node`](MetadataContent::Node); any other map is a per-key
/// [`Entries`](MetadataContent::Entries) table. The entry key `"*"` is
/// the wildcard, applied to any map key without a specific entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataContent {
    /// One node applied to every element of a sequence value.
    Node(Box<MetadataNode>),

    /// Per-key nodes for a map value, with optional `"*"` wildcard.
    Entries(IndexMap<String, MetadataNode>),
}

/// The node used where metadata must be present but declares nothing:
/// templates resolve, nothing is coerced, nothing recurses.
static EMPTY_NODE: LazyLock<MetadataNode> = LazyLock::new(MetadataNode::default);

impl MetadataNode {
    /// Create an empty metadata node.
    pub fn new() -> Self {
        Self::default()
    }

    /// The empty node: template resolution only.
    pub fn empty() -> &'static MetadataNode {
        &EMPTY_NODE
    }

    /// Set the scalar coercion type.
    pub fn with_coerce(mut self, name: impl Into<String>) -> Self {
        self.coerce = Some(name.into());
        self
    }

    /// Set a single content node, applied to every sequence element.
    pub fn with_element(mut self, node: MetadataNode) -> Self {
        self.content = Some(MetadataContent::Node(Box::new(node)));
        self
    }

    /// Set a per-key content table for map values.
    pub fn with_entries(mut self, entries: IndexMap<String, MetadataNode>) -> Self {
        self.content = Some(MetadataContent::Entries(entries));
        self
    }

    /// Set a wildcard-only content table: every map key gets `node`.
    pub fn with_wildcard(mut self, node: MetadataNode) -> Self {
        let mut entries = IndexMap::new();
        entries.insert("*".to_string(), node);
        self.content = Some(MetadataContent::Entries(entries));
        self
    }

    /// Enable template resolution of map keys.
    pub fn with_keys(mut self) -> Self {
        self.keys = true;
        self
    }

    /// The metadata node for elements of a sequence value.
    ///
    /// A per-key table in sequence position degrades to the empty node:
    /// elements are still template-resolved, but nothing applies the
    /// per-key rules.
    pub fn element_node(&self) -> Option<&MetadataNode> {
        match &self.content {
            None => None,
            Some(MetadataContent::Node(node)) => Some(node),
            Some(MetadataContent::Entries(_)) => Some(Self::empty()),
        }
    }

    /// The metadata node for a map entry: the key-specific entry if
    /// present, else the `"*"` wildcard, else none.
    ///
    /// A single content node in map position applies to nothing (there
    /// is no key to select it), so values pass through.
    pub fn entry_node(&self, key: &str) -> Option<&MetadataNode> {
        match &self.content {
            Some(MetadataContent::Entries(entries)) => {
                entries.get(key).or_else(|| entries.get("*"))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_node_priority() {
        let mut entries = IndexMap::new();
        entries.insert("a".to_string(), MetadataNode::new().with_coerce("number"));
        entries.insert("*".to_string(), MetadataNode::new().with_coerce("boolean"));
        let node = MetadataNode::new().with_entries(entries);

        assert_eq!(
            node.entry_node("a").and_then(|n| n.coerce.as_deref()),
            Some("number")
        );
        // Unlisted keys fall back to the wildcard
        assert_eq!(
            node.entry_node("other").and_then(|n| n.coerce.as_deref()),
            Some("boolean")
        );
    }

    #[test]
    fn test_entry_node_without_wildcard() {
        let mut entries = IndexMap::new();
        entries.insert("a".to_string(), MetadataNode::new());
        let node = MetadataNode::new().with_entries(entries);

        assert!(node.entry_node("a").is_some());
        assert!(node.entry_node("b").is_none());
    }

    #[test]
    fn test_element_node_shapes() {
        assert!(MetadataNode::new().element_node().is_none());

        let node = MetadataNode::new().with_element(MetadataNode::new().with_coerce("number"));
        assert_eq!(
            node.element_node().and_then(|n| n.coerce.as_deref()),
            Some("number")
        );

        // A per-key table in sequence position degrades to the empty node
        let node = MetadataNode::new().with_wildcard(MetadataNode::new());
        assert_eq!(node.element_node(), Some(MetadataNode::empty()));
    }

    #[test]
    fn test_deserialize_scalar_node() {
        let node: MetadataNode = serde_json::from_str(r#"{"type": "number"}"#).unwrap();
        assert_eq!(node.coerce.as_deref(), Some("number"));
        assert_eq!(node.content, None);
        assert!(!node.keys);
    }

    #[test]
    fn test_deserialize_sequence_content() {
        let node: MetadataNode =
            serde_json::from_str(r#"{"content": {"type": "boolean"}}"#).unwrap();
        assert_eq!(
            node.element_node().and_then(|n| n.coerce.as_deref()),
            Some("boolean")
        );
    }

    #[test]
    fn test_deserialize_entries_content() {
        let node: MetadataNode = serde_json::from_str(
            r#"{"keys": true, "content": {"width": {"type": "number"}, "*": {}}}"#,
        )
        .unwrap();
        assert!(node.keys);
        assert_eq!(
            node.entry_node("width").and_then(|n| n.coerce.as_deref()),
            Some("number")
        );
        assert!(node.entry_node("anything").is_some());
    }

    #[test]
    fn test_serialize_round_trip() {
        let node = MetadataNode::new()
            .with_keys()
            .with_wildcard(MetadataNode::new().with_coerce("number"));
        let json = serde_json::to_string(&node).unwrap();
        let back: MetadataNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}

//! Component type descriptors and hierarchy-aware metadata aggregation.
//!
//! Types form an explicit parent chain: every descriptor holds an
//! optional reference to its parent descriptor. Walking that chain and
//! merging each type's declared parsable-option table (root first, so
//! leaves override) yields the flat table the parser consumes.

use crate::metadata::MetadataNode;
use indexmap::IndexMap;
use std::sync::Arc;

/// A descriptor for one type in a component hierarchy.
///
/// Descriptors are immutable once built and are shared via `Arc` so a
/// derived type can hold its parent without copying.
#[derive(Debug, Clone)]
pub struct ComponentType {
    /// Type name, for diagnostics.
    name: String,

    /// The direct supertype, absent for root types.
    parent: Option<Arc<ComponentType>>,

    /// The parsable options this type itself declares. Does not include
    /// inherited declarations; see [`parsable_options`].
    parsable_options: IndexMap<String, MetadataNode>,
}

impl ComponentType {
    /// Create a root type with no parent.
    pub fn root(name: impl Into<String>) -> Self {
        ComponentType {
            name: name.into(),
            parent: None,
            parsable_options: IndexMap::new(),
        }
    }

    /// Create a type derived from `parent`.
    pub fn derived(name: impl Into<String>, parent: Arc<ComponentType>) -> Self {
        ComponentType {
            name: name.into(),
            parent: Some(parent),
            parsable_options: IndexMap::new(),
        }
    }

    /// Attach this type's own parsable-option declarations.
    pub fn with_parsable_options(mut self, options: IndexMap<String, MetadataNode>) -> Self {
        self.parsable_options = options;
        self
    }

    /// Declare a single parsable option on this type.
    pub fn with_option(mut self, name: impl Into<String>, node: MetadataNode) -> Self {
        self.parsable_options.insert(name.into(), node);
        self
    }

    /// The type's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The direct supertype, if any.
    pub fn parent(&self) -> Option<&Arc<ComponentType>> {
        self.parent.as_ref()
    }

    /// The options this type itself declares (no inheritance).
    pub fn declared_options(&self) -> &IndexMap<String, MetadataNode> {
        &self.parsable_options
    }

    /// The chain of ancestor types, root-most first, this type last.
    ///
    /// Always non-empty: a root type's chain is just itself.
    pub fn ancestor_chain(&self) -> Vec<&ComponentType> {
        let mut chain = Vec::new();
        let mut current = self;
        loop {
            chain.push(current);
            match current.parent() {
                Some(parent) => current = parent.as_ref(),
                None => break,
            }
        }
        chain.reverse();
        chain
    }

    /// The merged parsable-option table for this type.
    ///
    /// Each ancestor's declarations are merged in root-to-leaf order,
    /// so a leaf declaration for a given option replaces an ancestor's.
    /// Types declaring nothing contribute nothing.
    pub fn parsable_options(&self) -> IndexMap<String, MetadataNode> {
        let mut merged = IndexMap::new();
        for ty in self.ancestor_chain() {
            for (name, node) in ty.declared_options() {
                merged.insert(name.clone(), node.clone());
            }
        }
        merged
    }
}

/// An instance of a component type.
///
/// Implement this to expose an instance's type descriptor to the
/// hierarchy-walking entry points below.
pub trait Component {
    /// The descriptor of this instance's concrete type.
    fn component_type(&self) -> &ComponentType;
}

/// The ordered ancestor chain of an instance's type, root-most first.
pub fn ancestor_chain<C: Component>(instance: &C) -> Vec<&ComponentType> {
    instance.component_type().ancestor_chain()
}

/// The merged parsable-option table for an instance's type.
pub fn parsable_options<C: Component>(instance: &C) -> IndexMap<String, MetadataNode> {
    instance.component_type().parsable_options()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(coerce: &str) -> MetadataNode {
        MetadataNode::new().with_coerce(coerce)
    }

    struct Widget {
        ty: Arc<ComponentType>,
    }

    impl Component for Widget {
        fn component_type(&self) -> &ComponentType {
            &self.ty
        }
    }

    #[test]
    fn test_root_chain_is_single() {
        let root = ComponentType::root("Component");
        let chain = root.ancestor_chain();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].name(), "Component");
    }

    #[test]
    fn test_chain_is_root_first() {
        let root = Arc::new(ComponentType::root("Component"));
        let middle = Arc::new(ComponentType::derived("Screen", root.clone()));
        let leaf = ComponentType::derived("Form", middle);

        let names: Vec<&str> = leaf.ancestor_chain().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Component", "Screen", "Form"]);
    }

    #[test]
    fn test_merge_leaf_overrides_root() {
        let root = Arc::new(
            ComponentType::root("Component")
                .with_option("title", MetadataNode::new())
                .with_option("timeout", node("number")),
        );
        let leaf = ComponentType::derived("Screen", root).with_option("timeout", node("boolean"));

        let merged = leaf.parsable_options();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["title"], MetadataNode::new());
        // The leaf declaration wins
        assert_eq!(merged["timeout"], node("boolean"));
    }

    #[test]
    fn test_undeclaring_types_contribute_nothing() {
        let root = Arc::new(ComponentType::root("Component").with_option("title", MetadataNode::new()));
        let silent = Arc::new(ComponentType::derived("Middle", root));
        let leaf = ComponentType::derived("Leaf", silent);

        let merged = leaf.parsable_options();
        assert_eq!(merged.len(), 1);
        assert!(merged.contains_key("title"));
    }

    #[test]
    fn test_instance_entry_points() {
        let root = Arc::new(ComponentType::root("Component").with_option("title", MetadataNode::new()));
        let widget = Widget {
            ty: Arc::new(ComponentType::derived("Widget", root).with_option("label", MetadataNode::new())),
        };

        let chain = ancestor_chain(&widget);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.last().map(|t| t.name()), Some("Widget"));

        let options = parsable_options(&widget);
        assert!(options.contains_key("title"));
        assert!(options.contains_key("label"));
    }
}

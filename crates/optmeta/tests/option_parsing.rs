use indexmap::IndexMap;
use optmeta::{
    Component, ComponentType, MetadataNode, Value, parsable_options, parse, parse_requested,
};
use std::sync::Arc;

struct Screen {
    ty: Arc<ComponentType>,
}

impl Component for Screen {
    fn component_type(&self) -> &ComponentType {
        &self.ty
    }
}

/// Build a two-level hierarchy with metadata authored as JSON, the way
/// component libraries ship their declarations.
fn screen() -> Screen {
    let base_options: IndexMap<String, MetadataNode> = serde_json::from_str(
        r#"{
            "title": {},
            "timeout": {"type": "number"}
        }"#,
    )
    .unwrap();

    let screen_options: IndexMap<String, MetadataNode> = serde_json::from_str(
        r#"{
            "timeout": {"type": "boolean"},
            "style": {"keys": true, "content": {"*": {}}},
            "sizes": {"content": {"type": "number"}}
        }"#,
    )
    .unwrap();

    let base = Arc::new(ComponentType::root("Component").with_parsable_options(base_options));
    Screen {
        ty: Arc::new(ComponentType::derived("Screen", base).with_parsable_options(screen_options)),
    }
}

fn context() -> IndexMap<String, Value> {
    let mut context = IndexMap::new();
    context.insert("participant".to_string(), Value::from("p-07"));
    context.insert("trial".to_string(), Value::from(12));
    context
}

/// Test that hierarchy merging keeps ancestor options and lets the
/// derived type override shared ones
#[test]
fn test_merged_metadata_across_hierarchy() {
    let merged = parsable_options(&screen());

    assert_eq!(merged.len(), 4);
    // Inherited unchanged
    assert_eq!(merged["title"], MetadataNode::new());
    // Overridden by the derived type
    assert_eq!(merged["timeout"].coerce.as_deref(), Some("boolean"));
    assert!(merged.contains_key("style"));
    assert!(merged.contains_key("sizes"));
}

/// Test a full option tree resolving through the merged metadata
#[test]
fn test_parse_full_option_tree() {
    let merged = parsable_options(&screen());
    let context = context();
    let receiver = Value::Null;

    let title = parse(
        &Value::from("Trial ${trial} (${participant})"),
        &context,
        merged.get("title"),
        &receiver,
    )
    .unwrap();
    assert_eq!(title, Value::from("Trial 12 (p-07)"));

    let mut style = IndexMap::new();
    style.insert("color-${participant}".to_string(), Value::from("red"));
    let style = parse(&Value::Map(style), &context, merged.get("style"), &receiver).unwrap();

    let mut expected = IndexMap::new();
    expected.insert("color-p-07".to_string(), Value::from("red"));
    assert_eq!(style, Value::Map(expected));

    let sizes = parse(
        &Value::Array(vec![Value::from("${trial * 2}"), Value::from("10")]),
        &context,
        merged.get("sizes"),
        &receiver,
    )
    .unwrap();
    assert_eq!(
        sizes,
        Value::Array(vec![Value::Number(24.0), Value::Number(10.0)])
    );
}

/// Test the sparse-patch behavior of parse_requested over a supplied
/// option bag
#[test]
fn test_parse_requested_produces_sparse_patch() {
    let merged = parsable_options(&screen());
    let context = context();

    let mut raw = IndexMap::new();
    raw.insert("title".to_string(), Value::from("Block ${trial}"));
    raw.insert("timeout".to_string(), Value::from("false"));
    // sizes supplied but with nothing to resolve
    raw.insert("sizes".to_string(), Value::Array(vec![Value::Number(5.0)]));

    let changed = parse_requested(&raw, &context, &merged, &Value::Null).unwrap();

    assert_eq!(changed.len(), 2);
    assert_eq!(changed["title"], Value::from("Block 12"));
    // "false" coerces to boolean false, which differs from the raw string
    assert_eq!(changed["timeout"], Value::Bool(false));
    // sizes parsed to a value equal to its raw form, so it is omitted
    assert!(!changed.contains_key("sizes"));
}

/// Test that a broken nested option degrades to its raw form without
/// disturbing the rest of the bag
#[test]
fn test_broken_map_option_left_as_is() {
    let merged = parsable_options(&screen());
    let context = context();

    let mut style = IndexMap::new();
    style.insert("width".to_string(), Value::from("${undefined_var}"));
    let style = Value::Map(style);

    let mut raw = IndexMap::new();
    raw.insert("style".to_string(), style.clone());
    raw.insert("title".to_string(), Value::from("${participant}"));

    let changed = parse_requested(&raw, &context, &merged, &Value::Null).unwrap();

    // The style map failed internally and came back unchanged, so it is
    // omitted from the patch; the title still resolved
    assert_eq!(changed.len(), 1);
    assert_eq!(changed["title"], Value::from("p-07"));
}

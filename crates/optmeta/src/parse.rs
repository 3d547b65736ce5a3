//! The recursive option parser and the selective re-parser.

use crate::error::{OptionsError, OptionsResult};
use crate::metadata::MetadataNode;
use indexmap::IndexMap;
use optmeta_template::{Scope, Template, Value};

/// Parse a raw option value against its metadata.
///
/// Strings are resolved as templates against `context` (free
/// identifiers) and `receiver` (`this`), then coerced per the
/// metadata's declared type. Arrays and maps recurse per the metadata's
/// `content` rules. Positions without metadata, and value kinds the
/// parser does not process (numbers, booleans, null), pass through
/// unchanged.
///
/// # Errors
///
/// An unrecognized coercion type, or a template failure, propagates
/// when it occurs at the top level or inside an array. Inside a map the
/// first failing entry abandons that map's parse and the original map
/// is returned unchanged; a malformed nested option must not abort
/// sibling options elsewhere in the tree.
pub fn parse(
    raw: &Value,
    context: &IndexMap<String, Value>,
    metadata: Option<&MetadataNode>,
    receiver: &Value,
) -> OptionsResult<Value> {
    // Don't parse anything without metadata
    let Some(metadata) = metadata else {
        return Ok(raw.clone());
    };

    match raw {
        Value::String(source) => {
            let output = Template::compile(source)?.render(&Scope::new(context, receiver))?;

            // Coerce type if requested
            match metadata.coerce.as_deref() {
                None => Ok(Value::String(output)),
                Some("number") => Ok(Value::Number(Value::String(output).to_number())),
                Some("boolean") => Ok(Value::Bool(output.trim() != "false")),
                Some(other) => Err(OptionsError::UnknownCoercion {
                    name: other.to_string(),
                }),
            }
        }

        Value::Array(items) => {
            // The same element node applies to every element
            let element = metadata.element_node();
            let parsed = items
                .iter()
                .map(|item| parse(item, context, element, receiver))
                .collect::<OptionsResult<Vec<Value>>>()?;
            Ok(Value::Array(parsed))
        }

        Value::Map(entries) => {
            match parse_map(entries, context, metadata, receiver) {
                Ok(parsed) => Ok(Value::Map(parsed)),
                // Best-effort: a failure inside a map leaves the map as it was
                Err(error) => {
                    tracing::debug!(%error, "leaving map option unparsed");
                    Ok(raw.clone())
                }
            }
        }

        // Anything else passes through verbatim
        _ => Ok(raw.clone()),
    }
}

/// Parse every entry of a map-shaped option.
///
/// Keys are template-resolved when the metadata's `keys` flag is set;
/// values use the key-specific content node, falling back to the `"*"`
/// wildcard. The first failing entry fails the whole map.
fn parse_map(
    entries: &IndexMap<String, Value>,
    context: &IndexMap<String, Value>,
    metadata: &MetadataNode,
    receiver: &Value,
) -> OptionsResult<IndexMap<String, Value>> {
    let mut parsed = IndexMap::with_capacity(entries.len());

    for (key, value) in entries {
        let out_key = if metadata.keys {
            // Keys are resolved with the empty node: templates apply,
            // coercion does not
            parse(
                &Value::String(key.clone()),
                context,
                Some(MetadataNode::empty()),
                receiver,
            )?
            .display_string()
        } else {
            key.clone()
        };

        // Content lookup uses the raw key, not the resolved one
        let node = metadata.entry_node(key);
        let out_value = parse(value, context, node, receiver)?;
        parsed.insert(out_key, out_value);
    }

    Ok(parsed)
}

/// Re-parse only the options a caller actually supplied.
///
/// For every option declared in `metadata`, if `raw_options` holds a
/// truthy value for it, the value is parsed; the result is included in
/// the output only when parsing actually changed it. Options with no
/// (or falsy) raw value are never evaluated, so callers can apply the
/// result as a sparse patch over defaults they merge separately.
pub fn parse_requested(
    raw_options: &IndexMap<String, Value>,
    context: &IndexMap<String, Value>,
    metadata: &IndexMap<String, MetadataNode>,
    receiver: &Value,
) -> OptionsResult<IndexMap<String, Value>> {
    let mut changed = IndexMap::new();

    for (name, node) in metadata {
        let Some(raw) = raw_options.get(name) else {
            continue;
        };
        if !raw.is_truthy() {
            continue;
        }

        let candidate = parse(raw, context, Some(node), receiver)?;
        if candidate != *raw {
            changed.insert(name.clone(), candidate);
        }
    }

    tracing::trace!(requested = metadata.len(), changed = changed.len(), "re-parsed options");
    Ok(changed)
}

//! Metadata-driven option parsing for component hierarchies.
//!
//! Components declare, per type, a table of *parsable options*: metadata
//! describing which of their raw option values contain template
//! expressions and how resolved scalars should be coerced. This crate
//! merges those tables across a component's type hierarchy and resolves
//! raw option trees against a runtime context.
//!
//! # Key Features
//!
//! - **Hierarchy-aware metadata**: each type declares only its own
//!   options; [`parsable_options`] merges the declarations of every
//!   ancestor type, leaf declarations overriding ancestors
//! - **Recursive resolution**: [`parse`] walks strings, arrays, and
//!   maps, resolving template expressions and coercing scalars per the
//!   declared metadata
//! - **Best-effort maps**: a failure inside a map-shaped option leaves
//!   that map untouched instead of aborting the whole parse
//! - **Selective re-parsing**: [`parse_requested`] resolves only the
//!   options a caller actually supplied and reports only the values
//!   templating actually changed
//!
//! # Example
//!
//! ```
//! use indexmap::IndexMap;
//! use optmeta::{MetadataNode, Value, parse};
//!
//! let mut context = IndexMap::new();
//! context.insert("count".to_string(), Value::from(4));
//!
//! let raw = Value::from("${count * 2}");
//! let node = MetadataNode::new().with_coerce("number");
//!
//! let parsed = parse(&raw, &context, Some(&node), &Value::Null).unwrap();
//! assert_eq!(parsed, Value::Number(8.0));
//! ```

mod component;
mod error;
mod metadata;
mod parse;

pub use component::{Component, ComponentType, ancestor_chain, parsable_options};
pub use error::{OptionsError, OptionsResult};
pub use metadata::{MetadataContent, MetadataNode};
pub use parse::{parse, parse_requested};

// Re-export for convenience
pub use optmeta_template::{Scope, Template, Value};

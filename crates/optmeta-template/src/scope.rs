//! The variable scope templates are rendered against.

use crate::value::Value;
use indexmap::IndexMap;

/// A read-only scope for template evaluation.
///
/// Free identifiers in expressions resolve against `context`; the
/// `this` keyword resolves to `receiver`. Neither is ever mutated.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    /// Named variables visible to expressions.
    pub context: &'a IndexMap<String, Value>,

    /// The implicit invocation target for `this`-relative access.
    pub receiver: &'a Value,
}

impl<'a> Scope<'a> {
    /// Create a scope from a context map and a receiver.
    pub fn new(context: &'a IndexMap<String, Value>, receiver: &'a Value) -> Self {
        Scope { context, receiver }
    }

    /// Look up a free identifier in the context.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.context.get(name)
    }
}

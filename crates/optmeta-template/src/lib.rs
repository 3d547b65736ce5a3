//! Interpolation-only template engine with a scoped expression evaluator.
//!
//! This crate resolves template strings of the form `Hello ${name}` against
//! a read-only variable scope. It supports:
//!
//! - ES-style interpolation: `${expression}`
//! - Classic interpolation: `<%= expression %>`
//! - Literal escapes: `\${` produces the text `${`
//! - A small, data-only expression language: literals, identifiers,
//!   `this`-relative member access, arithmetic, comparison, logical
//!   operators, and the ternary conditional
//!
//! There is deliberately no auto-escaping and no statement/code-block
//! syntax: templates can interpolate expressions, nothing more. Free
//! identifiers resolve against the supplied context; `this` resolves
//! against the supplied receiver.
//!
//! # Example
//!
//! ```
//! use optmeta_template::{Scope, Template, Value};
//! use indexmap::IndexMap;
//!
//! let template = Template::compile("Hello, ${name}!").unwrap();
//!
//! let mut context = IndexMap::new();
//! context.insert("name".to_string(), Value::from("World"));
//! let receiver = Value::Null;
//!
//! let output = template.render(&Scope::new(&context, &receiver)).unwrap();
//! assert_eq!(output, "Hello, World!");
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod scope;
pub mod value;

// Re-export main types at crate root
pub use ast::{BinaryOp, Expr, Segment, UnaryOp};
pub use error::{TemplateError, TemplateResult};
pub use parser::Template;
pub use scope::Scope;
pub use value::Value;

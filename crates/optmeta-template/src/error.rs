//! Error types for template compilation and evaluation.

use thiserror::Error;

/// Errors that can occur during template operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    /// Error parsing the template or an embedded expression.
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// A free identifier was not found in the context.
    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String },

    /// Error evaluating an expression.
    #[error("Evaluation error: {message}")]
    Eval { message: String },
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

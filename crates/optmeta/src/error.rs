//! Error types for option parsing.

use optmeta_template::TemplateError;
use thiserror::Error;

/// Errors that can occur while parsing option values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OptionsError {
    /// Metadata declared a coercion type this parser does not know.
    ///
    /// This is a metadata authoring bug and always propagates when the
    /// offending string is not nested inside a map-shaped option.
    #[error("Output type {name} unknown, can't convert option")]
    UnknownCoercion { name: String },

    /// Template compilation or evaluation failed.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Result type for option parsing.
pub type OptionsResult<T> = Result<T, OptionsError>;

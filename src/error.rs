//! Library error type.

use thiserror::Error;

/// Errors raised while reading a pipeline configuration or a DOT graph.
#[derive(Debug, Error)]
pub enum Error {
    /// One of `sources`, `transforms` or `sinks` is absent.
    #[error("configuration is missing the `{0}` section")]
    MissingSection(&'static str),

    /// The configuration document itself is not an object.
    #[error("configuration must be an object, found {found}")]
    InvalidRoot { found: &'static str },

    #[error("configuration section `{section}` must be an object, found {found}")]
    InvalidSection {
        section: &'static str,
        found: &'static str,
    },

    #[error("component `{id}` is invalid: {reason}")]
    InvalidComponent { id: String, reason: String },

    /// An input reference that is neither a string nor an object.
    #[error("unexpected type for input of component `{component}`: {found}")]
    UnexpectedInputEncoding {
        component: String,
        found: &'static str,
    },

    #[error("invalid input reference on component `{component}`: {source}")]
    InvalidInputReference {
        component: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid JSON5 configuration: {0}")]
    Json5(#[from] json5::Error),

    #[error("DOT syntax error at {line}:{column}: {message}")]
    DotSyntax {
        line: usize,
        column: usize,
        message: String,
    },
}

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Name of a JSON value's type, for error messages.
pub(crate) const fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

//! Error types for fixture generation

use thiserror::Error;

/// Errors that can occur while compiling an operation or filling a response
#[derive(Debug, Error)]
pub enum FillError {
    /// An explicit `__typename` is not a possible type of the abstract type,
    /// or the abstract type has no possible types at all
    #[error("No type found for '{abstract_type}'{}", provided_type_suffix(.typename))]
    UnresolvedAbstractType {
        abstract_type: String,
        typename: Option<String>,
    },

    /// Diagnostics reported by the document compiler
    #[error("Failed to compile document: {0}")]
    Compile(String),

    /// The request names an operation the document does not define
    #[error("Operation not found in document: {0}")]
    OperationNotFound(String),

    /// The document defines no operation at all
    #[error("Document does not contain an operation")]
    NoOperation,

    /// A definition has no source location and the document has none to lend it
    #[error("Definition '{definition}' has no source location")]
    MissingLocation { definition: String },

    /// A field type that is not an output type of the schema
    #[error("Unknown output type: {0}")]
    UnknownType(String),
}

fn provided_type_suffix(typename: &Option<String>) -> String {
    match typename {
        Some(typename) => format!(
            " (provided type '{}' does not exist or is not a possible type)",
            typename
        ),
        None => String::new(),
    }
}

/// Result type alias for fill operations
pub type FillResult<T> = Result<T, FillError>;

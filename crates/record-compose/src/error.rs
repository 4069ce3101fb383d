//! Error types for record access and behavior invocation

use crate::value::ValueKind;

/// Errors raised while reading fields or invoking behaviors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("field `{0}` is not defined")]
    MissingField(String),

    #[error("field `{field}` holds {found}, expected {expected}")]
    TypeMismatch {
        field: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("field `{field}` holds {found} and cannot be called")]
    NotCallable { field: String, found: ValueKind },

    #[error("behavior takes {expected} argument(s), got {got}")]
    Arity { expected: usize, got: usize },

    #[error("argument {index} is {found}, expected {expected}")]
    InvalidArgument {
        index: usize,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("behavior `{field}` nests more than {limit} calls deep")]
    RecursionLimit { field: String, limit: usize },

    #[error("unsupported value: {0}")]
    Unsupported(String),
}

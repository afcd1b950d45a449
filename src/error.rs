//! Error types for protolisp.

use std::io;

/// Errors that can occur while decoding descriptors or generating Lisp code.
///
/// Every variant is fatal for the schema file being generated; the generator
/// never substitutes a fallback value.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Invalid varint encoding.
    #[error("invalid varint encoding")]
    InvalidVarint,
    /// Unexpected end of buffer.
    #[error("unexpected end of buffer")]
    UnexpectedEof,
    /// Invalid wire type.
    #[error("invalid wire type: {0}")]
    InvalidWireType(u8),
    /// Invalid UTF-8 in string field.
    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,
    /// A length prefix exceeds the decoder limit.
    #[error("message size {0} exceeds maximum")]
    MessageTooLarge(u64),

    /// Missing name field in descriptor.
    #[error("missing name in descriptor")]
    MissingName,
    /// Missing field number.
    #[error("missing number for `{0}`")]
    MissingFieldNumber(String),
    /// Invalid field type.
    #[error("invalid type {type_id} for field `{field}` (expected 1-18)")]
    InvalidFieldType { field: String, type_id: i32 },
    /// The file declares a syntax the generator does not know.
    #[error("unknown syntax `{syntax}` for file `{file}`")]
    UnknownSyntax { file: String, syntax: String },
    /// A file imports a dependency that is not part of the descriptor set.
    #[error("file `{file}` imports `{dependency}`, which is not in the descriptor set")]
    MissingDependency { file: String, dependency: String },
    /// A file requested for generation is not part of the descriptor set.
    #[error("file `{0}` is not in the descriptor set")]
    UnknownFile(String),
    /// A field, extendee or method references a type absent from the pool.
    #[error("`{referenced_from}` references unknown type `{type_name}`")]
    UnresolvedType {
        type_name: String,
        referenced_from: String,
    },
    /// A field default value cannot be rendered.
    #[error("invalid default `{value}` for field `{field}`: {reason}")]
    InvalidDefault {
        field: String,
        value: String,
        reason: &'static str,
    },

    /// Two distinct schema names map to the same Lisp identifier.
    #[error("`{first}` and `{second}` both map to `{identifier}` in {scope}")]
    IdentifierCollision {
        scope: String,
        identifier: String,
        first: String,
        second: String,
    },

    /// A template references a placeholder that was not supplied.
    #[error("template placeholder `${0}$` has no value")]
    UnknownPlaceholder(String),
    /// A template opens a placeholder without closing it.
    #[error("unterminated placeholder in template `{0}`")]
    UnterminatedPlaceholder(String),

    /// Invalid plugin parameter.
    #[error("invalid plugin parameter: {0}")]
    InvalidParameter(String),
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(_: std::string::FromUtf8Error) -> Self {
        Self::InvalidUtf8
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(_: std::str::Utf8Error) -> Self {
        Self::InvalidUtf8
    }
}

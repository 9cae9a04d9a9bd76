//! Error types for schema flattening

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur while declaring or flattening a schema
///
/// Every variant is detected during construction; a schema is either built
/// completely or not at all.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A nested record does not declare its `Root` sentinel as its first field
    #[error("missing field \"Root\" for field \"{path}\"")]
    MissingSentinel { path: String },

    /// A field is neither an identifier field nor a nested record
    #[error("invalid type \"{found}\" for field \"{path}\"")]
    InvalidFieldType { path: String, found: String },

    /// A requested annotation is absent or empty on a field
    #[error("missing tag \"{tag}\" for field \"{path}\"")]
    MissingAnnotation { tag: String, path: String },

    /// A composite declares no member fields
    #[error("composite field \"{path}\" has no member fields")]
    EmptyComposite { path: String },

    /// Two sibling fields share a name
    #[error("duplicate field \"{path}\"")]
    DuplicateField { path: String },

    /// A field name or tag key is not a valid identifier
    #[error("invalid name \"{path}\": {source}")]
    InvalidName {
        path: String,
        #[source]
        source: ValidationError,
    },

    /// A projection asked for a path the schema does not declare
    #[error("unknown field \"{path}\"")]
    UnknownField { path: String },

    /// A record declaration references itself, directly or indirectly
    #[error("record \"{record}\" is recursive")]
    RecursiveRecord { record: String },

    /// The declared root record does not exist
    #[error("unknown record \"{record}\"")]
    UnknownRecord { record: String },

    /// Failed to read a declaration file
    #[error("Failed to read schema file: {path}")]
    SchemaReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a declaration document
    #[error("Failed to parse schema: {0}")]
    Parse(String),
}

impl From<serde_yaml::Error> for SchemaError {
    fn from(e: serde_yaml::Error) -> Self {
        SchemaError::Parse(e.to_string())
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(e: serde_json::Error) -> Self {
        SchemaError::Parse(e.to_string())
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

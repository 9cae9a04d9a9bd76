//! Error types for mapping compilation

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while compiling mapping rules
///
/// Resolution itself never fails; every variant is raised by
/// [`Mapper::compile`](super::Mapper::compile) or while loading a rule table.
#[derive(Error, Debug)]
pub enum MappingError {
    /// A rule lists no destination fields
    #[error("mapping for source field \"{source_path}\" has no destination fields")]
    EmptyDestinationGroup { source_path: String },

    /// The same single destination was registered twice for one source field
    #[error("duplicate mapping from \"{source_path}\" to \"{destination_path}\"")]
    DuplicateDestination {
        source_path: String,
        destination_path: String,
    },

    /// A rule's source identifier is not part of the source schema
    #[error("source field {ordinal} is not part of the source schema")]
    UnknownSourceField { ordinal: u32 },

    /// A rule's destination identifier is not part of the destination schema
    #[error("destination field {ordinal} is not part of the destination schema")]
    UnknownDestinationField { ordinal: u32 },

    /// A rule table names a path that neither schema declares
    #[error("unknown field path \"{path}\"")]
    UnknownFieldPath { path: String },

    /// Failed to read a rule table file
    #[error("Failed to read rule table: {path}")]
    RuleReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a rule table
    #[error("Failed to parse rule table: {0}")]
    Parse(String),
}

impl From<serde_yaml::Error> for MappingError {
    fn from(e: serde_yaml::Error) -> Self {
        MappingError::Parse(e.to_string())
    }
}

impl From<serde_json::Error> for MappingError {
    fn from(e: serde_json::Error) -> Self {
        MappingError::Parse(e.to_string())
    }
}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;

//! Error types for loading, merging and documenting a field schema.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for fieldsdoc operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The schema parsed to no sections. Not fatal: nothing is generated.
    #[error("{path} is empty, fields.asciidoc cannot be generated")]
    EmptySchema { path: PathBuf },

    /// Two definitions of the same field disagree on `type`.
    #[error(
        "field \"{field}\" in section \"{section}\" redefined with different type \"{redefined}\" (was \"{existing}\")"
    )]
    TypeConflict {
        section: String,
        field: String,
        existing: String,
        redefined: String,
    },

    /// The reference listing could not be loaded.
    #[error("failed to load reference fields from {location}: {reason}")]
    ReferenceFetch { location: String, reason: String },

    #[error("schema file not found or unreadable: {path}")]
    MissingInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the run should end with a non-zero exit status.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::EmptySchema { .. })
    }
}

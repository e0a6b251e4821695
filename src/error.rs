//! Error types for schema description and document generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while translating type descriptors into schema nodes.
#[derive(Debug, Error)]
pub enum DescribeError {
    /// No registered describer claimed the descriptor set.
    ///
    /// Always surfaced to the caller: an undocumented field is worse than a
    /// loud failure.
    #[error("no describer supports type {shape}")]
    UnsupportedType { shape: String },

    /// Two distinct class identities resolved to the same reference name.
    #[error("reference name '{name}' already belongs to '{existing}', refusing to alias '{conflicting}'")]
    AmbiguousReference {
        name: String,
        existing: String,
        conflicting: String,
    },

    /// A descriptor names a class missing from the class registry.
    #[error("unknown class '{name}' in type descriptor")]
    UnknownClass { name: String },
}

impl DescribeError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        // All describe failures are schema/metadata errors
        2
    }
}

/// Errors raised while loading metadata or running whole-document generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid metadata JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Describe(#[from] DescribeError),
}

impl GenerateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            GenerateError::FileNotFound { .. } | GenerateError::ReadError { .. } => 3,
            GenerateError::InvalidJson { .. } => 2,
            GenerateError::Describe(e) => e.exit_code(),
        }
    }
}

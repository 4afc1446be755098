//! Error types for the decoding and label-extraction pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can abort a parse or an export.
///
/// Malformed directives and empty results are deliberately absent: the parser
/// records those as warnings and keeps going.
#[derive(Debug, Error)]
pub enum BoardTextError {
    /// A source file could not be read.
    #[error("failed to read `{}`: {source}", .path.display())]
    Io {
        /// Path of the file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A label document could not be written.
    #[error("failed to write `{}`: {source}", .path.display())]
    Write {
        /// Path of the output file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Parse options were rejected before any work started.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// A label document could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

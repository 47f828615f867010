//! Saving comments to text files.
//!
//! # Architecture
//!
//! - [`namer`]: Export file names and the per-scan registry of unique names
//! - [`writer`]: Writing a comment under the overwrite and timestamp policy

pub mod namer;
pub mod writer;

use std::path::PathBuf;

pub use namer::{export_name, ExportNames, EXPORT_SUFFIX, MAX_ATTEMPTS};
pub use writer::{write_export, ExportTarget, WriteOutcome};

/// Errors that can occur while saving a comment.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// The export file could not be created.
    #[error("{path}: cannot create export: {source}")]
    Create {
        /// Destination file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The export file could not be written.
    #[error("{path}: cannot write export: {source}")]
    Write {
        /// Destination file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The archive's modification time could not be applied.
    #[error("{path}: cannot set modification time: {source}")]
    Timestamp {
        /// Destination file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An empty export file could not be removed.
    #[error("{path}: cannot remove empty export: {source}")]
    Remove {
        /// Destination file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Every numbered variant of the export name is already taken.
    #[error("no unique export name left in {dir} for {archive} after {MAX_ATTEMPTS} attempts")]
    NamesExhausted {
        /// Source archive
        archive: PathBuf,
        /// Save directory
        dir: PathBuf,
    },
}

impl ExportError {
    /// Returns true for naming exhaustion, as opposed to an I/O failure.
    #[must_use]
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, Self::NamesExhausted { .. })
    }

    /// Returns true if the file was written despite the error.
    #[must_use]
    pub fn file_written(&self) -> bool {
        matches!(self, Self::Timestamp { .. })
    }
}

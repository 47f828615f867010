//! Scanner module for archive discovery and comment collection.
//!
//! This module provides functionality for:
//! - Sorted depth-first directory walking using walkdir
//! - Recognising ZIP archives by extension
//! - Driving the per-archive read, dedup and export pipeline
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and archive discovery
//! - [`finder`]: Orchestrates one scan over one or more roots
//!
//! # Example
//!
//! ```no_run
//! use zipcmt::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(archive) => println!("{}: {} bytes", archive.path.display(), archive.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod finder;
pub mod walker;

use std::path::{Path, PathBuf};

pub use finder::{CommentFinder, FinderError};
pub use walker::Walker;

/// A ZIP archive discovered during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path to the archive
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl ArchiveEntry {
    /// Create a new ArchiveEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkerConfig {
    /// Descend into subdirectories of the root.
    /// When false only the entries directly inside the root are visited.
    pub recursive: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self { recursive: true }
    }
}

impl WalkerConfig {
    /// Create a configuration.
    #[must_use]
    pub fn new(recursive: bool) -> Self {
        Self { recursive }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing the root.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The root was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Any other failure to read the root.
    #[error("Cannot read {path}: {source}")]
    Root {
        /// The root path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An I/O error below the root. The walk continues past it.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Returns true if the error ends the scan of its root.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }

    /// The path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(path) | Self::NotFound(path) => path,
            Self::Root { path, .. } | Self::Io { path, .. } => path,
        }
    }
}

/// Returns true if `path` has a `.zip` extension, in any letter case.
///
/// A file named just `.zip` counts as an archive with an empty stem.
#[must_use]
pub fn is_archive(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
        || is_bare_extension(path)
}

/// Returns true if the file name is `.zip` alone.
pub(crate) fn is_bare_extension(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.eq_ignore_ascii_case(".zip"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_entry_new() {
        let entry = ArchiveEntry::new(PathBuf::from("/test/file.zip"), 1024);

        assert_eq!(entry.path, PathBuf::from("/test/file.zip"));
        assert_eq!(entry.size, 1024);
    }

    #[test]
    fn test_walker_config_default() {
        assert!(WalkerConfig::default().recursive);
        assert!(!WalkerConfig::new(false).recursive);
    }

    #[test]
    fn test_is_archive() {
        assert!(is_archive(Path::new("a.zip")));
        assert!(is_archive(Path::new("/dir/B.ZIP")));
        assert!(is_archive(Path::new("c.Zip")));
        assert!(!is_archive(Path::new("d.zip.txt")));
        assert!(!is_archive(Path::new("zip")));
        assert!(!is_archive(Path::new("e.7z")));
    }

    #[test]
    fn test_is_archive_bare_extension() {
        assert!(is_archive(Path::new(".zip")));
        assert!(is_archive(Path::new("/dir/.ZIP")));
        assert!(!is_archive(Path::new(".zipx")));
        assert!(!is_archive(Path::new("a.zip/.txt")));
    }

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::PermissionDenied(PathBuf::from("/test"));
        assert_eq!(err.to_string(), "Permission denied: /test");
        assert!(err.is_fatal());

        let err = ScanError::NotFound(PathBuf::from("/missing"));
        assert_eq!(err.to_string(), "Path not found: /missing");
        assert_eq!(err.path(), Path::new("/missing"));

        let err = ScanError::Io {
            path: PathBuf::from("/root/sub"),
            source: std::io::Error::other("boom"),
        };
        assert_eq!(err.to_string(), "I/O error for /root/sub: boom");
        assert!(!err.is_fatal());
    }
}

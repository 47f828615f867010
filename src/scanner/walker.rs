//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing directories
//! and yielding the ZIP archives found in them.
//!
//! Entries are visited depth-first with each directory's children sorted by
//! file name. The order matters: when two archives carry the same comment,
//! the one visited first is the one that counts.
//!
//! # Features
//!
//! - Sorted, deterministic traversal
//! - Optional single-level ("no walk") scan
//! - Root errors end the walk; errors below the root are skipped
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use zipcmt::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::new(false));
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(archive) => println!("{}", archive.path.display()),
//!         Err(e) if e.is_fatal() => eprintln!("Error: {}", e),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use super::{is_archive, ArchiveEntry, ScanError, WalkerConfig};

/// Directory walker for archive discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory or archive to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// Once the flag is `true` the walker yields nothing further.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk the tree, yielding archive entries.
    ///
    /// Errors are yielded as [`ScanError`] values. A fatal error (see
    /// [`ScanError::is_fatal`]) is always the last item; any other error is
    /// followed by the rest of the walk. Permission errors below the root
    /// are skipped without being yielded.
    pub fn walk(&self) -> impl Iterator<Item = Result<ArchiveEntry, ScanError>> + '_ {
        let mut walk_dir = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name();
        if !self.config.recursive {
            walk_dir = walk_dir.max_depth(1);
        }

        walk_dir
            .into_iter()
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                    return false;
                }
                true
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(&entry),
                Err(e) => self.handle_walk_error(e),
            })
            .scan(false, |stop, item| {
                if *stop {
                    return None;
                }
                *stop = matches!(&item, Err(e) if e.is_fatal());
                Some(item)
            })
    }

    /// Turn a directory entry into an archive entry if it is one.
    fn process_entry(&self, entry: &DirEntry) -> Option<Result<ArchiveEntry, ScanError>> {
        if entry.file_type().is_dir() || !is_archive(entry.path()) {
            return None;
        }

        // Follows a symlink to its target.
        let metadata = match std::fs::metadata(entry.path()) {
            Ok(m) => m,
            Err(e) => return self.handle_io_error(entry.path(), entry.depth(), e),
        };

        if !metadata.is_file() {
            log::trace!("Skipping non-file: {}", entry.path().display());
            return None;
        }

        Some(Ok(ArchiveEntry::new(
            entry.path().to_path_buf(),
            metadata.len(),
        )))
    }

    /// Handle I/O errors during entry access.
    fn handle_io_error(
        &self,
        path: &Path,
        depth: usize,
        error: std::io::Error,
    ) -> Option<Result<ArchiveEntry, ScanError>> {
        let path = path.to_path_buf();

        if depth == 0 || path == self.root {
            log::debug!("Cannot walk root {}: {}", path.display(), error);
            return Some(Err(match error.kind() {
                ErrorKind::PermissionDenied => ScanError::PermissionDenied(path),
                ErrorKind::NotFound => ScanError::NotFound(path),
                _ => ScanError::Root {
                    path,
                    source: error,
                },
            }));
        }

        match error.kind() {
            ErrorKind::PermissionDenied => {
                log::debug!("Permission denied, skipping: {}", path.display());
                None
            }
            ErrorKind::NotFound => {
                log::debug!("File not found (may have been deleted): {}", path.display());
                None
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), error);
                Some(Err(ScanError::Io {
                    path,
                    source: error,
                }))
            }
        }
    }

    /// Handle walkdir errors.
    fn handle_walk_error(&self, error: walkdir::Error) -> Option<Result<ArchiveEntry, ScanError>> {
        let depth = error.depth();
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        let source = std::io::Error::from(error);
        self.handle_io_error(&path, depth, source)
    }
}

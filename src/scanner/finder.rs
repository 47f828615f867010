//! Comment finder orchestrating one scan.
//!
//! # Overview
//!
//! [`CommentFinder`] walks each root in turn and runs every archive it
//! finds through the same pipeline:
//!
//! 1. **Read** - extract and normalise the archive comment
//! 2. **Dedup** - skip content already counted in this scan
//! 3. **Report** - hand the comment to the observer (printing)
//! 4. **Export** - save it alongside the archive and/or into the save
//!    directory
//!
//! Everything runs on the calling thread, one archive at a time. All state
//! lives in a session created per call, so two calls never share counters,
//! digests or export names.
//!
//! # Example
//!
//! ```no_run
//! use zipcmt::config::ScanOptions;
//! use zipcmt::scanner::CommentFinder;
//!
//! let finder = CommentFinder::new(ScanOptions::default().with_show_all(true));
//! let summary = finder.find_comments(&["/mnt/bbs/files", "/mnt/cdrom"]);
//!
//! println!(
//!     "{} comments in {} archives",
//!     summary.comments_accepted, summary.zips_seen
//! );
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use bytesize::ByteSize;

use super::{ArchiveEntry, ScanError, Walker, WalkerConfig};
use crate::comment::{read_comment, ArchiveComment, CommentRead};
use crate::config::{resolve_save_dir, ScanOptions};
use crate::duplicates::admit;
use crate::export::{export_name, write_export, ExportError, ExportTarget, WriteOutcome};
use crate::progress::ScanObserver;
use crate::session::{ScanSession, ScanSummary};

/// Errors that end the scan of a root.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The root could not be walked.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Scans roots for archive comments.
pub struct CommentFinder {
    options: ScanOptions,
    shutdown_flag: Option<Arc<AtomicBool>>,
    observer: Option<Arc<dyn ScanObserver>>,
}

impl CommentFinder {
    /// Create a finder with the given options.
    #[must_use]
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            shutdown_flag: None,
            observer: None,
        }
    }

    /// Stop at the next directory entry once `flag` is set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Report scan events to `observer`.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The options this finder scans with.
    #[must_use]
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn notify(&self, event: impl FnOnce(&dyn ScanObserver)) {
        if let Some(observer) = &self.observer {
            event(observer.as_ref());
        }
    }

    /// Scan every root, in order, sharing one session.
    ///
    /// A root that cannot be walked is recorded in
    /// [`ScanSummary::root_errors`] and the next root is scanned. Comments
    /// are deduplicated across all roots.
    pub fn find_comments<P: AsRef<Path>>(&self, roots: &[P]) -> ScanSummary {
        let mut session = ScanSession::new(roots.len());
        let save_dir = self.prepare_save_dir(&mut session);

        for root in roots {
            let root = root.as_ref();
            if self.is_shutdown_requested() {
                session.interrupted = true;
                break;
            }
            match self.walk_root(root, save_dir.as_deref(), &mut session) {
                Ok(()) => {}
                Err(FinderError::Interrupted) => {
                    session.interrupted = true;
                    break;
                }
                Err(FinderError::Scan(err)) => {
                    log::warn!("{err}");
                    self.notify(|o| o.on_error(&err));
                    session.record_root_failure(root.to_path_buf(), err);
                }
            }
        }

        self.finish(session)
    }

    /// Scan a single root in a session of its own.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Scan`] when the root is missing or cannot be
    /// read. An interrupted scan is not an error; see
    /// [`ScanSummary::interrupted`].
    pub fn scan_root(&self, root: &Path) -> Result<ScanSummary, FinderError> {
        let mut session = ScanSession::new(1);
        let save_dir = self.prepare_save_dir(&mut session);

        match self.walk_root(root, save_dir.as_deref(), &mut session) {
            Ok(()) => {}
            Err(FinderError::Interrupted) => session.interrupted = true,
            Err(err) => return Err(err),
        }
        Ok(self.finish(session))
    }

    /// Check the save directory once, before any walking.
    fn prepare_save_dir(&self, session: &mut ScanSession) -> Option<PathBuf> {
        let dir = self.options.save_dir.as_ref()?;
        match resolve_save_dir(dir) {
            Ok(path) => Some(path),
            Err(err) => {
                log::warn!("{err}");
                self.notify(|o| o.on_error(&err));
                session.config_error = Some(err.to_string());
                None
            }
        }
    }

    fn walk_root(
        &self,
        root: &Path,
        save_dir: Option<&Path>,
        session: &mut ScanSession,
    ) -> Result<(), FinderError> {
        log::debug!("Scanning {}", root.display());
        self.notify(|o| o.on_root(root));

        let mut walker = Walker::new(root, WalkerConfig::new(self.options.recursive));
        if let Some(flag) = &self.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }

        for result in walker.walk() {
            match result {
                Ok(archive) => self.process_archive(&archive, save_dir, session),
                Err(err) if err.is_fatal() => return Err(err.into()),
                Err(err) => self.notify(|o| o.on_error(&err)),
            }
        }

        if self.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }
        Ok(())
    }

    fn process_archive(
        &self,
        archive: &ArchiveEntry,
        save_dir: Option<&Path>,
        session: &mut ScanSession,
    ) {
        session.zips_seen += 1;
        self.notify(|o| o.on_archive(archive, session.zips_seen));

        let comment = match read_comment(&archive.path, self.options.raw) {
            CommentRead::Found(comment) => comment,
            CommentRead::Blank(reason) => {
                log::trace!("No comment in {} ({:?})", archive.path.display(), reason);
                return;
            }
            CommentRead::Unreadable(_) => {
                session.unreadable += 1;
                return;
            }
        };

        if !admit(
            &comment.text,
            &mut session.hashes,
            self.options.show_all_duplicates,
        ) {
            return;
        }
        session.comments_accepted += 1;
        self.notify(|o| o.on_comment(&comment));

        let modified = if self.options.now {
            None
        } else {
            comment.modified
        };

        if self.options.export_alongside {
            if let Some(path) = export_name(&comment.path) {
                if self.export(path, &comment, modified, session) {
                    session.saved += 1;
                }
            }
        }

        if let Some(dir) = save_dir {
            match session.names.unique(&comment.path, dir) {
                Some(path) => {
                    if self.export(path, &comment, modified, session) {
                        session.saved += 1;
                    }
                }
                None => {
                    let err = ExportError::NamesExhausted {
                        archive: comment.path.clone(),
                        dir: dir.to_path_buf(),
                    };
                    log::warn!("{err}");
                    self.notify(|o| o.on_error(&err));
                    session.export_errors += 1;
                }
            }
        }

        log::debug!("{} {}", session.stats(), archive.path.display());
    }

    /// Write one export, returning true if a file was written.
    fn export(
        &self,
        path: PathBuf,
        comment: &ArchiveComment,
        modified: Option<SystemTime>,
        session: &mut ScanSession,
    ) -> bool {
        let target = ExportTarget {
            path,
            content: comment.text.as_bytes(),
            overwrite: self.options.overwrite,
            modified,
        };

        match write_export(&target) {
            Ok(WriteOutcome::Saved { bytes }) => {
                log::debug!(
                    "SAVED: {} ({}) << {}",
                    target.path.display(),
                    ByteSize::b(bytes as u64),
                    comment.path.display()
                );
                self.notify(|o| o.on_saved(&target.path));
                true
            }
            Ok(WriteOutcome::SkippedExists { size }) => {
                self.notify(|o| o.on_skipped(&target.path, size));
                false
            }
            Ok(WriteOutcome::Removed | WriteOutcome::Empty) => false,
            Err(err) => {
                log::warn!("{err}");
                self.notify(|o| o.on_error(&err));
                session.export_errors += 1;
                err.file_written()
            }
        }
    }

    fn finish(&self, session: ScanSession) -> ScanSummary {
        if self.options.save_dir.is_some() {
            log::debug!(
                "Saved {} comments from {} finds",
                session.saved,
                session.comments_accepted
            );
        }
        let summary = session.finish();
        log::debug!("Scan finished, time taken: {:?}", summary.elapsed);
        self.notify(|o| o.on_finish(&summary));
        summary
    }
}

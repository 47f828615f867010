//! Session module for the state of one scan.
//!
//! A scan invocation owns exactly one [`ScanSession`]: the counters, the
//! set of comment digests already counted and the registry of export names
//! already handed out. It lives for one call to
//! [`CommentFinder::find_comments`](crate::scanner::CommentFinder::find_comments)
//! and is turned into an immutable [`ScanSummary`] at the end.
//!
//! # Features
//!
//! * **Isolation**: Sessions are never shared between invocations.
//! * **Reporting**: The summary serializes to JSON for `--json`.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use bytesize::ByteSize;
use serde::{Serialize, Serializer};

use crate::duplicates::CommentHashes;
use crate::export::ExportNames;
use crate::scanner::ScanError;

/// A root that could not be scanned.
#[derive(Debug, Serialize)]
pub struct RootFailure {
    /// The root as given by the caller
    pub root: PathBuf,
    /// Why the root was abandoned
    #[serde(serialize_with = "serialize_display")]
    pub error: ScanError,
}

/// Result of one scan.
#[derive(Debug, Default, Serialize)]
pub struct ScanSummary {
    /// Archives visited
    pub zips_seen: u64,
    /// Comments counted (unique ones unless showing all)
    pub comments_accepted: u64,
    /// Export files written, alongside archives and in the save directory
    pub saved: u64,
    /// Archives that could not be parsed
    pub unreadable: u64,
    /// Exports that failed
    pub export_errors: u64,
    /// Wall time of the scan
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    /// Number of roots requested
    pub roots: usize,
    /// Roots abandoned because of a fatal error
    pub root_errors: Vec<RootFailure>,
    /// Save directory problem reported before the walk, if any
    pub config_error: Option<String>,
    /// The scan was cancelled
    pub interrupted: bool,
}

impl ScanSummary {
    /// Returns true if every requested root failed.
    #[must_use]
    pub fn all_roots_failed(&self) -> bool {
        self.roots > 0 && self.root_errors.len() >= self.roots
    }

    /// Returns true if anything went wrong short of a total failure.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.root_errors.is_empty() || self.config_error.is_some() || self.export_errors > 0
    }
}

fn serialize_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

fn serialize_display<S: Serializer, T: std::fmt::Display>(v: &T, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(v)
}

/// Mutable state of one scan.
#[derive(Debug)]
pub(crate) struct ScanSession {
    pub zips_seen: u64,
    pub comments_accepted: u64,
    pub saved: u64,
    pub unreadable: u64,
    pub export_errors: u64,
    pub hashes: CommentHashes,
    pub names: ExportNames,
    pub roots: usize,
    pub root_errors: Vec<RootFailure>,
    pub config_error: Option<String>,
    pub interrupted: bool,
    started: Instant,
}

impl ScanSession {
    pub fn new(roots: usize) -> Self {
        Self {
            zips_seen: 0,
            comments_accepted: 0,
            saved: 0,
            unreadable: 0,
            export_errors: 0,
            hashes: CommentHashes::new(),
            names: ExportNames::new(),
            roots,
            root_errors: Vec::new(),
            config_error: None,
            interrupted: false,
            started: Instant::now(),
        }
    }

    /// Running counters for debug logging.
    pub fn stats(&self) -> String {
        format!(
            "zip#: {}, cmmt#: {}, hashes: {}, names: {}",
            self.zips_seen,
            self.comments_accepted,
            ByteSize::b(self.hashes.digest_bytes()),
            ByteSize::b(self.names.name_bytes() as u64),
        )
    }

    pub fn record_root_failure(&mut self, root: PathBuf, error: ScanError) {
        self.root_errors.push(RootFailure { root, error });
    }

    pub fn finish(self) -> ScanSummary {
        ScanSummary {
            zips_seen: self.zips_seen,
            comments_accepted: self.comments_accepted,
            saved: self.saved,
            unreadable: self.unreadable,
            export_errors: self.export_errors,
            elapsed: self.started.elapsed(),
            roots: self.roots,
            root_errors: self.root_errors,
            config_error: self.config_error,
            interrupted: self.interrupted,
        }
    }
}

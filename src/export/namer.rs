//! Export file naming.
//!
//! # Overview
//!
//! Comments saved next to their archive are named
//! `<archive stem>-zipcomment.txt`. Comments collected into one save
//! directory can come from archives with the same stem in different
//! folders, so [`ExportNames`] hands out names that are unique for the
//! whole scan:
//!
//! ```text
//! readme-zipcomment.txt
//! readme-zipcomment_1.txt
//! readme-zipcomment_2.txt
//! ```

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::scanner::is_bare_extension;

/// Suffix appended to the archive stem.
pub const EXPORT_SUFFIX: &str = "-zipcomment.txt";

/// Number of numbered candidates tried before giving up.
pub const MAX_ATTEMPTS: u32 = 9_999;

/// Path of the text file saved alongside `archive`.
///
/// Returns `None` for a path without a file name.
///
/// # Example
///
/// ```
/// use zipcmt::export::export_name;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     export_name(Path::new("/home/retro/myfile.zip")),
///     Some(PathBuf::from("/home/retro/myfile-zipcomment.txt"))
/// );
/// ```
#[must_use]
pub fn export_name(archive: &Path) -> Option<PathBuf> {
    Some(archive.with_file_name(base_name(archive)?))
}

/// `<stem>-zipcomment.txt` for `archive`.
fn base_name(archive: &Path) -> Option<OsString> {
    let mut name = if is_bare_extension(archive) {
        OsString::new()
    } else {
        archive.file_stem()?.to_os_string()
    };
    name.push(EXPORT_SUFFIX);
    Some(name)
}

/// Registry of export paths handed out during one scan.
///
/// Append-only: a path, once returned, is never returned again.
#[derive(Debug, Default)]
pub struct ExportNames {
    used: HashSet<PathBuf>,
    name_bytes: usize,
}

impl ExportNames {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a unique path in `dest` for the comment of `archive`.
    ///
    /// On Windows the file name is lower-cased so names differing only by
    /// case are not treated as distinct.
    ///
    /// Returns `None` when `archive` has no file name or when
    /// [`MAX_ATTEMPTS`] numbered names are all taken.
    pub fn unique(&mut self, archive: &Path, dest: &Path) -> Option<PathBuf> {
        let name = base_name(archive)?;
        #[cfg(windows)]
        let name = OsString::from(name.to_string_lossy().to_lowercase());

        let path = self.find(&dest.join(name))?;
        self.register(path.clone());
        Some(path)
    }

    /// Find the first unregistered variant of `candidate`.
    ///
    /// An unregistered candidate is returned as is. Otherwise the number in
    /// a trailing `_<digits>` segment of the file stem (0 when absent) is
    /// incremented until a free name turns up:
    ///
    /// - `file.txt` → `file_1.txt`, `file_2.txt`, …
    /// - `file_3.txt` → `file_4.txt`, `file_5.txt`, …
    /// - `file_a.txt` → `file_a_1.txt`, …
    #[must_use]
    pub fn find(&self, candidate: &Path) -> Option<PathBuf> {
        if !self.used.contains(candidate) {
            return Some(candidate.to_path_buf());
        }

        let stem = candidate.file_stem()?.to_string_lossy().into_owned();
        let ext = candidate
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let (prefix, start) = match stem.rsplit_once('_') {
            Some((prefix, tail)) => match tail.parse::<u32>() {
                Ok(n) => (prefix.to_string(), n),
                Err(_) => (stem.clone(), 0),
            },
            None => (stem.clone(), 0),
        };

        for step in 1..=MAX_ATTEMPTS {
            let n = start.checked_add(step)?;
            let next = candidate.with_file_name(format!("{prefix}_{n}{ext}"));
            if !self.used.contains(&next) {
                return Some(next);
            }
        }

        log::warn!(
            "No free export name for {} after {} attempts",
            candidate.display(),
            MAX_ATTEMPTS
        );
        None
    }

    /// Mark `path` as used.
    pub fn register(&mut self, path: PathBuf) {
        let len = path.as_os_str().len();
        if self.used.insert(path) {
            self.name_bytes += len;
        }
    }

    /// Number of registered paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// Returns true if no path was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Total length of the registered paths, in bytes.
    #[must_use]
    pub fn name_bytes(&self) -> usize {
        self.name_bytes
    }
}

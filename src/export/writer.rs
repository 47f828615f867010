//! Export file writer.
//!
//! Writes comment text to a file, honouring the overwrite policy and
//! copying the archive's modification time to the new file.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::time::SystemTime;

use bytesize::ByteSize;
use filetime::FileTime;

use super::ExportError;

/// One export to perform.
#[derive(Debug, Clone)]
pub struct ExportTarget<'a> {
    /// Destination file
    pub path: PathBuf,
    /// Comment text
    pub content: &'a [u8],
    /// Replace an existing destination file
    pub overwrite: bool,
    /// Modification time to give the written file
    pub modified: Option<SystemTime>,
}

/// What [`write_export`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was written.
    Saved {
        /// Bytes written, including the trailing newline
        bytes: usize,
    },
    /// The destination exists and overwriting is off.
    SkippedExists {
        /// Size of the existing file
        size: u64,
    },
    /// Nothing ended up in the file, so it was removed.
    Removed,
    /// There was no content to write.
    Empty,
}

/// Content with exactly one trailing newline guaranteed.
fn with_newline(content: &[u8]) -> Cow<'_, [u8]> {
    if content.ends_with(b"\n") {
        Cow::Borrowed(content)
    } else {
        let mut owned = Vec::with_capacity(content.len() + 1);
        owned.extend_from_slice(content);
        owned.push(b'\n');
        Cow::Owned(owned)
    }
}

/// Write an export file.
///
/// # Errors
///
/// Returns an [`ExportError`] when the file cannot be created, written,
/// timestamped or cleaned up. A timestamp failure leaves the written file
/// in place.
///
/// # Example
///
/// ```no_run
/// use zipcmt::export::{write_export, ExportTarget, WriteOutcome};
/// use std::path::PathBuf;
///
/// let target = ExportTarget {
///     path: PathBuf::from("notes-zipcomment.txt"),
///     content: b"Hello",
///     overwrite: false,
///     modified: None,
/// };
/// assert_eq!(write_export(&target)?, WriteOutcome::Saved { bytes: 6 });
/// # Ok::<(), zipcmt::export::ExportError>(())
/// ```
pub fn write_export(target: &ExportTarget<'_>) -> Result<WriteOutcome, ExportError> {
    let path = &target.path;
    if target.content.is_empty() {
        return Ok(WriteOutcome::Empty);
    }

    if !target.overwrite {
        if let Ok(existing) = fs::metadata(path) {
            log::debug!(
                "SKIP (exists): {} ({})",
                path.display(),
                ByteSize::b(existing.len())
            );
            return Ok(WriteOutcome::SkippedExists {
                size: existing.len(),
            });
        }
    }

    let body = with_newline(target.content);
    let mut file = File::create(path).map_err(|source| ExportError::Create {
        path: path.clone(),
        source,
    })?;
    file.write_all(&body)
        .and_then(|()| file.flush())
        .map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;

    let written = file
        .metadata()
        .map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?
        .len();
    drop(file);

    if written == 0 {
        fs::remove_file(path).map_err(|source| ExportError::Remove {
            path: path.clone(),
            source,
        })?;
        return Ok(WriteOutcome::Removed);
    }

    if let Some(modified) = target.modified {
        filetime::set_file_times(path, FileTime::now(), FileTime::from_system_time(modified))
            .map_err(|source| ExportError::Timestamp {
                path: path.clone(),
                source,
            })?;
    }

    Ok(WriteOutcome::Saved { bytes: body.len() })
}

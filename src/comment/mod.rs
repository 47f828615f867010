//! ZIP archive comment extraction.
//!
//! This module provides functionality for:
//! - Locating the end-of-central-directory record of a ZIP archive
//! - Reading the archive comment stored in that record
//! - Removing SAUCE trailers appended by DOS-era tools
//! - Decoding code page 437 text into Unicode
//!
//! # Architecture
//!
//! - [`reader`]: Opens an archive and classifies its comment
//! - [`trailer`]: SAUCE record detection and removal
//! - [`cp437`]: Code page 437 to Unicode decoding
//!
//! # Example
//!
//! ```no_run
//! use zipcmt::comment::{read_comment, CommentRead};
//! use std::path::Path;
//!
//! match read_comment(Path::new("archive.zip"), false) {
//!     CommentRead::Found(comment) => println!("{}", comment.text.to_lossy()),
//!     CommentRead::Blank(reason) => println!("no comment ({reason:?})"),
//!     CommentRead::Unreadable(err) => eprintln!("skipped: {err}"),
//! }
//! ```

pub mod cp437;
pub mod reader;
pub mod trailer;

use std::borrow::Cow;
use std::path::PathBuf;
use std::time::SystemTime;

pub use reader::{read_comment, SENTINEL_PREFIX};

/// Comment text in either its decoded or its original encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentText {
    /// Text decoded from code page 437 with any SAUCE trailer removed.
    Decoded(String),
    /// The original comment bytes, untouched.
    Raw(Vec<u8>),
}

impl CommentText {
    /// The text as stored or written to an export file.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Decoded(s) => s.as_bytes(),
            Self::Raw(b) => b,
        }
    }

    /// The text with leading and trailing whitespace removed.
    ///
    /// Decoded text trims Unicode whitespace. Raw text can be in any
    /// legacy encoding, so only ASCII whitespace is trimmed.
    #[must_use]
    pub fn trimmed(&self) -> &[u8] {
        match self {
            Self::Decoded(s) => s.trim().as_bytes(),
            Self::Raw(b) => trim_blank(b),
        }
    }

    /// Whether the text kept its original encoding.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true for empty text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// The text as a string, replacing invalid UTF-8 in raw text.
    #[must_use]
    pub fn to_lossy(&self) -> Cow<'_, str> {
        match self {
            Self::Decoded(s) => Cow::Borrowed(s),
            Self::Raw(b) => String::from_utf8_lossy(b),
        }
    }
}

/// A comment extracted from one archive.
#[derive(Debug, Clone)]
pub struct ArchiveComment {
    /// Path to the source archive
    pub path: PathBuf,
    /// The comment text
    pub text: CommentText,
    /// Last modification time of the archive, if the platform reports one
    pub modified: Option<SystemTime>,
}

/// Why an archive yielded no usable comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlankReason {
    /// The archive has no comment.
    Empty,
    /// The comment is a deterministic repackaging marker.
    Sentinel,
    /// The comment holds only whitespace.
    Whitespace,
}

/// Result of reading an archive comment.
#[derive(Debug)]
pub enum CommentRead {
    /// A usable comment.
    Found(ArchiveComment),
    /// The archive was read but holds no usable comment.
    Blank(BlankReason),
    /// The archive could not be opened or parsed.
    ///
    /// Treated as "no comment" by the scanner so a damaged archive never
    /// stops a walk.
    Unreadable(ReadError),
}

impl CommentRead {
    /// The comment, if one was found.
    #[must_use]
    pub fn into_comment(self) -> Option<ArchiveComment> {
        match self {
            Self::Found(comment) => Some(comment),
            _ => None,
        }
    }
}

/// Errors that make an archive unreadable.
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    /// The archive could not be opened or read.
    #[error("skip named zip file due to read error: {path}: {source}")]
    Io {
        /// Path of the archive
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is too small to hold an end-of-central-directory record.
    #[error("not a zip archive, file too short: {0}")]
    TooShort(PathBuf),

    /// No end-of-central-directory record was found.
    #[error("not a zip archive, no end of central directory: {0}")]
    MissingEndRecord(PathBuf),

    /// The end record points at an invalid central directory.
    #[error("corrupt zip archive, bad central directory: {0}")]
    CentralDirectory(PathBuf),
}

/// Trim the ASCII whitespace set (space, `\t`, `\n`, `\v`, `\f`, `\r`).
#[must_use]
pub fn trim_blank(bytes: &[u8]) -> &[u8] {
    let is_blank = |b: &u8| matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r');
    let start = bytes.iter().position(|b| !is_blank(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !is_blank(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Minimal ZIP archive builder for tests.

    use std::path::{Path, PathBuf};

    /// Build a stored single-entry archive (one empty file) with `comment`.
    pub fn zip_with_comment(comment: &[u8]) -> Vec<u8> {
        let name = b"readme.txt";
        let mut out = Vec::new();

        // Local file header
        out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0x21u16.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(name);

        // Central directory header
        let cd_offset = out.len() as u32;
        out.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0x21u16.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(name);
        let cd_size = out.len() as u32 - cd_offset;

        // End of central directory
        out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&cd_size.to_le_bytes());
        out.extend_from_slice(&cd_offset.to_le_bytes());
        out.extend_from_slice(&(comment.len() as u16).to_le_bytes());
        out.extend_from_slice(comment);
        out
    }

    /// Remove all permissions from `dir`. Returns false, with the mode
    /// restored, when the current user can still list it (root).
    #[cfg(unix)]
    pub fn lock_dir(dir: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;

        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o000)).unwrap();
        if std::fs::read_dir(dir).is_ok() {
            unlock_dir(dir);
            return false;
        }
        true
    }

    #[cfg(unix)]
    pub fn unlock_dir(dir: &Path) {
        use std::os::unix::fs::PermissionsExt;

        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Write an archive with `comment` to `dir/name`.
    pub fn write_zip(dir: &Path, name: &str, comment: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, zip_with_comment(comment)).unwrap();
        path
    }
}
